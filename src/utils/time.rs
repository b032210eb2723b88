//! Time parsing and formatting utilities

use crate::domain::errors::DomainError;

/// Parser for the ISO-8601 durations the search provider reports
/// (`PT1H2M3S`, `P1DT2H`, `P0D`)
pub struct DurationParser;

impl DurationParser {
    /// Parse an ISO-8601 duration into whole seconds.
    ///
    /// Fractional seconds are truncated. Year and month designators are
    /// rejected since their length in seconds is ambiguous.
    pub fn parse(iso: &str) -> Result<u64, DomainError> {
        let invalid = || DomainError::BadArgs(format!("Invalid ISO-8601 duration: {}", iso));

        let rest = iso.trim().strip_prefix('P').ok_or_else(invalid)?;
        if rest.is_empty() {
            return Err(invalid());
        }

        let (date_part, time_part) = match rest.split_once('T') {
            Some((date, time)) => {
                if time.is_empty() {
                    return Err(invalid());
                }
                (date, Some(time))
            }
            None => (rest, None),
        };

        let mut total: u64 = 0;
        for (value, unit) in Self::components(date_part).ok_or_else(invalid)? {
            let factor = match unit {
                'W' => 7 * 86_400,
                'D' => 86_400,
                _ => return Err(invalid()),
            };
            total = total.saturating_add(value.saturating_mul(factor));
        }

        if let Some(time_part) = time_part {
            for (value, unit) in Self::components(time_part).ok_or_else(invalid)? {
                let factor = match unit {
                    'H' => 3_600,
                    'M' => 60,
                    'S' => 1,
                    _ => return Err(invalid()),
                };
                total = total.saturating_add(value.saturating_mul(factor));
            }
        }

        Ok(total)
    }

    /// Parse a duration, treating anything unparseable as zero seconds
    pub fn parse_or_zero(iso: &str) -> u64 {
        Self::parse(iso).unwrap_or(0)
    }

    /// Split `1H2M3.5S` into `[(1, 'H'), (2, 'M'), (3, 'S')]`
    fn components(part: &str) -> Option<Vec<(u64, char)>> {
        let mut components = Vec::new();
        let mut digits = String::new();
        let mut in_fraction = false;

        for c in part.chars() {
            match c {
                '0'..='9' if !in_fraction => digits.push(c),
                '0'..='9' => {}
                '.' | ',' if !digits.is_empty() && !in_fraction => in_fraction = true,
                unit if unit.is_ascii_uppercase() => {
                    if digits.is_empty() || (in_fraction && unit != 'S') {
                        return None;
                    }
                    components.push((digits.parse().ok()?, unit));
                    digits.clear();
                    in_fraction = false;
                }
                _ => return None,
            }
        }

        if !digits.is_empty() {
            return None;
        }
        Some(components)
    }
}

/// Format whole seconds as `H:MM:SS` or `M:SS`
pub fn format_seconds(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{}:{:02}", minutes, secs)
    }
}
