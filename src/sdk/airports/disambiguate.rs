use super::error::AirportError;
use super::resolver::Candidate;
use std::collections::HashMap;
use std::io::{BufRead, Write};

/// One outstanding decision: which reference row does `identifier` mean?
#[derive(Debug)]
pub struct DisambiguationRequest<'r, 'a> {
    pub identifier: &'r str,
    /// 1-based travel-log row where the identifier first appears.
    pub first_seen_row: usize,
    pub candidates: &'r [Candidate<'a>],
}

impl<'a> DisambiguationRequest<'_, 'a> {
    pub fn candidate_rows(&self) -> Vec<usize> {
        self.candidates.iter().map(|c| c.row).collect()
    }

    /// Maps a chosen reference row back to its candidate.
    pub fn validate(&self, choice: usize) -> Result<Candidate<'a>, AirportError> {
        self.candidates
            .iter()
            .find(|c| c.row == choice)
            .copied()
            .ok_or_else(|| AirportError::InvalidChoice {
                identifier: self.identifier.to_string(),
                choice: choice.to_string(),
                candidates: self.candidate_rows(),
            })
    }
}

/// Policy for ambiguous identifiers. Returns the chosen reference row.
pub trait Disambiguator {
    fn choose(&mut self, request: &DisambiguationRequest<'_, '_>) -> Result<usize, AirportError>;
}

/// Always takes the lowest reference row. Only used when asked for explicitly.
#[derive(Debug, Default, Clone, Copy)]
pub struct FirstCandidate;

impl Disambiguator for FirstCandidate {
    fn choose(&mut self, request: &DisambiguationRequest<'_, '_>) -> Result<usize, AirportError> {
        let row = request
            .candidates
            .iter()
            .map(|c| c.row)
            .min()
            .ok_or_else(|| AirportError::AmbiguousMatch {
                identifier: request.identifier.to_string(),
                candidates: Vec::new(),
            })?;
        log::warn!(
            "Picking first candidate row {} for {} out of {:?}",
            row,
            request.identifier,
            request.candidate_rows()
        );
        Ok(row)
    }
}

/// Stops the run on the first ambiguous identifier.
#[derive(Debug, Default, Clone, Copy)]
pub struct RefuseAmbiguity;

impl Disambiguator for RefuseAmbiguity {
    fn choose(&mut self, request: &DisambiguationRequest<'_, '_>) -> Result<usize, AirportError> {
        Err(AirportError::AmbiguousMatch {
            identifier: request.identifier.to_string(),
            candidates: request.candidate_rows(),
        })
    }
}

/// Asks an operator on a text stream. Anything but a number is fatal.
pub struct PromptDisambiguator<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> PromptDisambiguator<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> Disambiguator for PromptDisambiguator<R, W> {
    fn choose(&mut self, request: &DisambiguationRequest<'_, '_>) -> Result<usize, AirportError> {
        writeln!(
            self.output,
            "{} (first seen on travel row {}) matches several reference airports:",
            request.identifier, request.first_seen_row
        )?;
        for c in request.candidates {
            writeln!(
                self.output,
                "  [{}] {} {} ({}, {}) local={} iata={}",
                c.row,
                c.record.ident,
                c.record.name,
                c.record.municipality,
                c.record.iso_country,
                c.record.local_code,
                c.record.iata_code
            )?;
        }
        write!(self.output, "Enter the reference row to use: ")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(AirportError::AmbiguousMatch {
                identifier: request.identifier.to_string(),
                candidates: request.candidate_rows(),
            });
        }
        let answer = line.trim();
        answer.parse().map_err(|_| AirportError::InvalidChoice {
            identifier: request.identifier.to_string(),
            choice: answer.to_string(),
            candidates: request.candidate_rows(),
        })
    }
}

/// Decisions fixed ahead of time (e.g. from the command line), falling back
/// to another policy for identifiers without one.
pub struct PresetChoices {
    choices: HashMap<String, usize>,
    fallback: Box<dyn Disambiguator>,
}

impl PresetChoices {
    pub fn new(choices: HashMap<String, usize>, fallback: Box<dyn Disambiguator>) -> Self {
        Self { choices, fallback }
    }
}

impl Disambiguator for PresetChoices {
    fn choose(&mut self, request: &DisambiguationRequest<'_, '_>) -> Result<usize, AirportError> {
        match self.choices.get(request.identifier) {
            Some(&row) => {
                log::debug!("Using preset row {} for {}", row, request.identifier);
                Ok(row)
            }
            None => self.fallback.choose(request),
        }
    }
}

/// Parses `CODE=ROW`.
pub fn parse_preset(s: &str) -> Result<(String, usize), String> {
    let (code, row) = s
        .split_once('=')
        .ok_or_else(|| format!("expected CODE=ROW, got {s:?}"))?;
    let code = code.trim();
    if code.is_empty() {
        return Err(format!("missing code in {s:?}"));
    }
    let row = row
        .trim()
        .parse()
        .map_err(|_| format!("row in {s:?} is not a number"))?;
    Ok((code.to_string(), row))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sdk::airports::record::AirportRecord;

    fn records() -> Vec<AirportRecord> {
        vec![
            AirportRecord::new("PWM", "", "43.6462,-70.3093"),
            AirportRecord::new("2B2", "PWM", "10.0,10.0"),
        ]
    }

    fn candidates(records: &[AirportRecord]) -> Vec<Candidate<'_>> {
        vec![
            Candidate {
                row: 7,
                record: &records[0],
            },
            Candidate {
                row: 12,
                record: &records[1],
            },
        ]
    }

    #[test]
    fn test_prompt_reads_a_row_number() {
        let records = records();
        let candidates = candidates(&records);
        let request = DisambiguationRequest {
            identifier: "PWM",
            first_seen_row: 3,
            candidates: &candidates,
        };
        let mut out = Vec::new();
        let mut prompt = PromptDisambiguator::new("12\n".as_bytes(), &mut out);
        assert_eq!(prompt.choose(&request).unwrap(), 12);

        let shown = String::from_utf8(out).unwrap();
        assert!(shown.contains("travel row 3"));
        assert!(shown.contains("[7]"));
        assert!(shown.contains("[12]"));
    }

    #[test]
    fn test_prompt_garbage_is_invalid_choice() {
        let records = records();
        let candidates = candidates(&records);
        let request = DisambiguationRequest {
            identifier: "PWM",
            first_seen_row: 3,
            candidates: &candidates,
        };
        let mut prompt = PromptDisambiguator::new("seven\n".as_bytes(), std::io::sink());
        assert!(matches!(
            prompt.choose(&request),
            Err(AirportError::InvalidChoice { .. })
        ));
    }

    #[test]
    fn test_prompt_closed_input_is_an_unmade_decision() {
        let records = records();
        let candidates = candidates(&records);
        let request = DisambiguationRequest {
            identifier: "PWM",
            first_seen_row: 3,
            candidates: &candidates,
        };
        let mut prompt = PromptDisambiguator::new("".as_bytes(), std::io::sink());
        assert!(matches!(
            prompt.choose(&request),
            Err(AirportError::AmbiguousMatch { .. })
        ));
    }

    #[test]
    fn test_validate_accepts_only_candidate_rows() {
        let records = records();
        let candidates = candidates(&records);
        let request = DisambiguationRequest {
            identifier: "PWM",
            first_seen_row: 1,
            candidates: &candidates,
        };
        assert_eq!(request.validate(12).unwrap().record.local_code, "2B2");
        assert!(matches!(
            request.validate(8),
            Err(AirportError::InvalidChoice { .. })
        ));
    }

    #[test]
    fn test_preset_choices_fall_back() {
        let records = records();
        let candidates = candidates(&records);
        let request = DisambiguationRequest {
            identifier: "PWM",
            first_seen_row: 1,
            candidates: &candidates,
        };

        let mut preset = PresetChoices::new(
            HashMap::from([("PWM".to_string(), 12)]),
            Box::new(RefuseAmbiguity),
        );
        assert_eq!(preset.choose(&request).unwrap(), 12);

        let mut empty = PresetChoices::new(HashMap::new(), Box::new(FirstCandidate));
        assert_eq!(empty.choose(&request).unwrap(), 7);
    }

    #[test]
    fn test_parse_preset() {
        assert_eq!(parse_preset("PWM=12"), Ok(("PWM".to_string(), 12)));
        assert!(parse_preset("PWM").is_err());
        assert!(parse_preset("=12").is_err());
        assert!(parse_preset("PWM=x").is_err());
    }
}
