use std::sync::Arc;

use crate::adapters::{
    FacebookPublishAdapter, FfmpegTrimAdapter, YoutubeSearchAdapter, YtDlpDownloadAdapter,
};
use crate::app::publish_interactor::PublishPipeline;
use crate::config_initialization::AppConfig;
use crate::ports::{DownloadPort, PublishPort, SearchPort, TranscodePort};

pub trait AppContainer: Send + Sync {
    fn publish_pipeline(&self) -> Arc<PublishPipeline>;
}

/// Wires the production adapters into the pipeline
pub struct DefaultAppContainer {
    publish_pipeline: Arc<PublishPipeline>,
}

impl DefaultAppContainer {
    pub fn new(config: &AppConfig) -> Self {
        let search_port = Arc::new(YoutubeSearchAdapter::with_base_url(
            config.credentials.youtube_api_key.clone(),
            config.run.license_filter().to_string(),
            config.youtube_api_url.clone(),
        ));
        let download_port = Arc::new(YtDlpDownloadAdapter::new(config.ytdlp_program.clone()));
        let transcode_port = Arc::new(
            FfmpegTrimAdapter::new(config.ffmpeg_program.clone())
                .with_settings(config.encode.clone()),
        );
        let publish_port = Arc::new(
            FacebookPublishAdapter::new(
                config.credentials.facebook_page_id.clone(),
                config.credentials.facebook_page_token.clone(),
            )
            .with_endpoint(config.graph_url.clone(), config.graph_version.clone()),
        );

        let publish_pipeline = Arc::new(PublishPipeline::new(
            search_port as Arc<dyn SearchPort>,
            download_port as Arc<dyn DownloadPort>,
            transcode_port as Arc<dyn TranscodePort>,
            publish_port as Arc<dyn PublishPort>,
            config.run.clone(),
            config.work_dir.clone(),
        ));

        Self { publish_pipeline }
    }
}

impl AppContainer for DefaultAppContainer {
    fn publish_pipeline(&self) -> Arc<PublishPipeline> {
        Arc::clone(&self.publish_pipeline)
    }
}
