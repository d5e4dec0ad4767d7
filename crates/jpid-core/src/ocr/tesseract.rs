//! Tesseract command-line adapter.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Instant;

use tempfile::TempDir;
use tracing::{debug, info};

use crate::error::OcrError;
use crate::models::config::OcrConfig;

use super::{OcrBackend, OcrEngine, Position, RegionClassifier, TextFragment};

/// TSV column count (level .. text).
const TSV_COLUMNS: usize = 12;

/// Word rows in tesseract TSV output.
const WORD_LEVEL: u32 = 5;

/// Runs the `tesseract` binary once per extraction call.
#[derive(Debug, Clone)]
pub struct TesseractBackend {
    config: OcrConfig,
}

impl TesseractBackend {
    pub fn new(config: OcrConfig) -> Self {
        Self { config }
    }

    /// Whether the configured binary can be executed.
    pub fn is_available(&self) -> bool {
        Command::new(&self.config.binary)
            .arg("--version")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }
}

impl OcrBackend for TesseractBackend {
    fn name(&self) -> &'static str {
        "tesseract"
    }

    fn acquire(&self) -> Result<Box<dyn OcrEngine>, OcrError> {
        let workdir = tempfile::Builder::new().prefix("jpid-ocr-").tempdir()?;
        Ok(Box::new(TesseractEngine {
            config: self.config.clone(),
            classifier: RegionClassifier::new(),
            workdir: Some(workdir),
        }))
    }
}

/// One tesseract session backed by a private scratch directory.
struct TesseractEngine {
    config: OcrConfig,
    classifier: RegionClassifier,
    workdir: Option<TempDir>,
}

impl TesseractEngine {
    fn workdir(&self) -> Result<&Path, OcrError> {
        self.workdir
            .as_ref()
            .map(TempDir::path)
            .ok_or_else(|| OcrError::Unavailable("engine already released".to_string()))
    }

    /// Write the image, run tesseract and return the output file path.
    fn run(&self, image: &[u8], stem: &str, extension: &str) -> Result<PathBuf, OcrError> {
        if image.is_empty() {
            return Err(OcrError::EmptyImage);
        }

        let dir = self.workdir()?;
        let input_path = dir.join(format!("{}_input", stem));
        let output_base = dir.join(format!("{}_output", stem));
        std::fs::write(&input_path, image)?;

        let mut cmd = Command::new(&self.config.binary);
        cmd.arg(&input_path)
            .arg(&output_base)
            .arg("-l")
            .arg(&self.config.languages)
            .arg("--oem")
            .arg(self.config.oem.to_string())
            .arg("--psm")
            .arg(self.config.psm.to_string());

        if !self.config.char_whitelist.is_empty() {
            cmd.arg("-c")
                .arg(format!("tessedit_char_whitelist={}", self.config.char_whitelist));
        }

        cmd.arg("--dpi").arg(self.config.dpi.to_string());

        if extension == "tsv" {
            cmd.arg("tsv");
        }

        if let Some(ref prefix) = self.config.tessdata_prefix {
            cmd.env("TESSDATA_PREFIX", prefix);
        }

        let start = Instant::now();
        let output = cmd.output().map_err(|e| {
            OcrError::Process(format!(
                "failed to run {}: {}",
                self.config.binary.display(),
                e
            ))
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(OcrError::Process(format!(
                "tesseract exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        debug!(
            "tesseract ({}) finished in {}ms",
            extension,
            start.elapsed().as_millis()
        );

        Ok(output_base.with_extension(extension))
    }
}

impl OcrEngine for TesseractEngine {
    fn extract_text(&mut self, image: &[u8]) -> Result<String, OcrError> {
        let output_path = self.run(image, "text", "txt")?;
        let text = std::fs::read_to_string(&output_path)?;

        let text = text.trim();
        if text.is_empty() {
            return Err(OcrError::NoText);
        }

        info!("tesseract recognized {} characters", text.chars().count());
        Ok(text.to_string())
    }

    fn extract_regions(&mut self, image: &[u8]) -> Result<Vec<TextFragment>, OcrError> {
        let output_path = self.run(image, "regions", "tsv")?;
        let tsv = std::fs::read_to_string(&output_path)?;

        let fragments: Vec<TextFragment> = parse_tsv(&tsv, self.config.default_confidence)
            .into_iter()
            .map(|mut fragment| {
                fragment.category = self.classifier.classify(&fragment.text);
                fragment
            })
            .collect();

        info!("tesseract produced {} text fragments", fragments.len());
        Ok(fragments)
    }

    fn release(&mut self) -> Result<(), OcrError> {
        if let Some(dir) = self.workdir.take() {
            dir.close()?;
        }
        Ok(())
    }
}

/// One word row from the TSV output.
struct TsvWord {
    text: String,
    position: Position,
    confidence: Option<f32>,
}

/// Words sharing a (page, block, paragraph, line) key.
#[derive(Default)]
struct TsvLine {
    words: Vec<TsvWord>,
}

impl TsvLine {
    fn into_fragment(self, default_confidence: f32) -> Option<TextFragment> {
        let mut text = String::new();
        let mut position: Option<Position> = None;
        let mut prev: Option<&TsvWord> = None;

        for word in &self.words {
            if let Some(prev) = prev {
                // Separate words by a space only where the page shows a visible gap.
                let gap = word.position.x - prev.position.right();
                if gap as f32 > prev.position.height as f32 * 0.5 {
                    text.push(' ');
                }
            }
            text.push_str(&word.text);
            position = Some(match position {
                Some(p) => p.union(&word.position),
                None => word.position,
            });
            prev = Some(word);
        }

        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        let scores: Vec<f32> = self.words.iter().filter_map(|w| w.confidence).collect();
        let confidence = if scores.is_empty() {
            default_confidence
        } else {
            scores.iter().sum::<f32>() / scores.len() as f32
        };

        let mut fragment = TextFragment::classified(text).with_confidence(confidence);
        if let Some(position) = position {
            fragment = fragment.with_position(position);
        }
        Some(fragment)
    }
}

/// Parse tesseract TSV output into one fragment per text line.
///
/// The header row, malformed rows and rows without text are skipped.
/// Word confidences are rescaled to 0.0 - 1.0; negative values count as
/// missing.
pub fn parse_tsv(tsv: &str, default_confidence: f32) -> Vec<TextFragment> {
    let mut order: Vec<(u32, u32, u32, u32)> = Vec::new();
    let mut lines: HashMap<(u32, u32, u32, u32), TsvLine> = HashMap::new();

    for row in tsv.lines().skip(1) {
        if row.trim().is_empty() {
            continue;
        }

        let cols: Vec<&str> = row.split('\t').collect();
        if cols.len() < TSV_COLUMNS {
            continue;
        }

        let num = |i: usize| cols[i].trim().parse::<i64>().ok();
        let Some(level) = num(0) else { continue };
        if level != WORD_LEVEL as i64 {
            continue;
        }

        let text = cols[11].trim();
        if text.is_empty() {
            continue;
        }

        let (Some(page), Some(block), Some(par), Some(line)) = (num(1), num(2), num(3), num(4))
        else {
            continue;
        };
        let position = Position {
            x: num(6).unwrap_or(0) as i32,
            y: num(7).unwrap_or(0) as i32,
            width: num(8).unwrap_or(0).max(0) as u32,
            height: num(9).unwrap_or(0).max(0) as u32,
        };
        let confidence = cols[10]
            .trim()
            .parse::<f32>()
            .ok()
            .filter(|c| *c >= 0.0)
            .map(|c| (c / 100.0).min(1.0));

        let key = (page as u32, block as u32, par as u32, line as u32);
        let entry = lines.entry(key).or_insert_with(|| {
            order.push(key);
            TsvLine::default()
        });
        entry.words.push(TsvWord {
            text: text.to_string(),
            position,
            confidence,
        });
    }

    order
        .into_iter()
        .filter_map(|key| lines.remove(&key))
        .filter_map(|line| line.into_fragment(default_confidence))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ocr::FragmentCategory;

    const HEADER: &str =
        "level\tpage_num\tblock_num\tpar_num\tline_num\tword_num\tleft\ttop\twidth\theight\tconf\ttext";

    fn row(block: u32, line: u32, word: u32, left: i32, width: u32, conf: &str, text: &str) -> String {
        format!(
            "5\t1\t{}\t1\t{}\t{}\t{}\t100\t{}\t30\t{}\t{}",
            block, line, word, left, width, conf, text
        )
    }

    #[test]
    fn test_parse_tsv_groups_words_into_lines() {
        let tsv = [
            HEADER.to_string(),
            "1\t1\t0\t0\t0\t0\t0\t0\t800\t600\t-1\t".to_string(),
            row(1, 1, 1, 10, 30, "96.0", "田中"),
            row(1, 1, 2, 40, 30, "90.0", "太郎"),
            row(1, 2, 1, 10, 60, "88.5", "東京都港区"),
            row(2, 1, 1, 10, 60, "-1", "平成5年12月25日生"),
        ]
        .join("\n");

        let fragments = parse_tsv(&tsv, 0.8);
        assert_eq!(fragments.len(), 3);

        assert_eq!(fragments[0].text, "田中太郎");
        assert_eq!(fragments[0].category, FragmentCategory::Name);
        assert!((fragments[0].confidence - 0.93).abs() < 1e-4);
        assert_eq!(
            fragments[0].position,
            Some(Position { x: 10, y: 100, width: 60, height: 30 })
        );

        assert_eq!(fragments[1].category, FragmentCategory::Address);
        assert_eq!(fragments[2].category, FragmentCategory::Date);
        assert!((fragments[2].confidence - 0.8).abs() < f32::EPSILON);
    }

    #[test]
    fn test_parse_tsv_inserts_space_at_visible_gap() {
        let tsv = [
            HEADER.to_string(),
            row(1, 1, 1, 10, 40, "95", "氏名"),
            row(1, 1, 2, 120, 40, "95", "山田"),
            row(1, 1, 3, 160, 40, "95", "花子"),
        ]
        .join("\n");

        let fragments = parse_tsv(&tsv, 0.8);
        assert_eq!(fragments[0].text, "氏名 山田花子");
    }

    #[test]
    fn test_parse_tsv_skips_malformed_and_empty_rows() {
        let tsv = [
            HEADER.to_string(),
            "5\t1\t1".to_string(),
            row(1, 1, 1, 10, 30, "95", " "),
            String::new(),
        ]
        .join("\n");

        assert!(parse_tsv(&tsv, 0.8).is_empty());
    }
}
