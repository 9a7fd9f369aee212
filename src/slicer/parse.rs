//! Parser for the slicer mapping mini-language.
//!
//! The format is the one shipped with the vanilla slicer tooling and is
//! treated as a fixed external wire format. A mapping is a sequence of
//! input blocks:
//!
//! ```text
//! input("gui/sprites/widgets.png",
//!     new OutputFile("gui/sprites/button.png", new Box(0, 0, 20, 20, 200, 200)),
//!     new OutputFile("gui/sprites/slot.png", new Box(0, 20,
//!         18, 18, 200, 200))
//!         .metadata("""
//!             { "gui": { "scaling": { "type": "nine_slice" } } }
//!         """),
//! )
//! ```
//!
//! Each block runs from its `input(` marker to the next one. A `Box` takes
//! six non-negative integers (x, y, w, h, reference width, reference
//! height), not necessarily on one line. Metadata payloads are captured
//! verbatim and attached to the preceding output; triple-quoted blocks win
//! over single-line strings when both are present. Malformed boxes skip
//! that one output; blocks with no valid outputs are dropped.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{MewError, Result};

use super::{SliceInput, SliceRule, SliceSpec, SpriteBox};

static INPUT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)input\(\s*"([^"]+)"\s*,"#).unwrap());

static OUTPUT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)new\s+OutputFile\(\s*"([^"]+)"\s*,\s*new\s+Box\(\s*([0-9\s,]+)\s*\)"#)
        .unwrap()
});

static BOX_NUMS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+)\s*,\s*(\d+)\s*,\s*(\d+)\s*,\s*(\d+)\s*,\s*(\d+)\s*,\s*(\d+)").unwrap()
});

static METADATA_TRIPLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?ms)\.metadata\(\s*"""\s*$(.*?)^\s*"""\s*\)"#).unwrap());

static METADATA_SINGLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?s)\.metadata\(\s*"([^"]+)"\s*\)"#).unwrap());

/// Parse slicer mapping text into a [`SliceSpec`].
///
/// Parsing never fails as a whole: unrecognized text is skipped and only
/// well-formed outputs survive.
pub fn parse_slicer(text: &str) -> SliceSpec {
    let mut spec = SliceSpec::new();

    let blocks: Vec<(std::ops::Range<usize>, String)> = INPUT_RE
        .captures_iter(text)
        .filter_map(|cap| {
            let whole = cap.get(0)?;
            Some((whole.range(), cap.get(1)?.as_str().to_string()))
        })
        .collect();

    for (i, (range, path)) in blocks.iter().enumerate() {
        let block_end = blocks
            .get(i + 1)
            .map(|(next, _)| next.start)
            .unwrap_or(text.len());
        let block = &text[range.end..block_end];

        let rules = parse_block(block);
        if !rules.is_empty() {
            spec.push(SliceInput {
                path: path.clone(),
                rules,
            });
        }
    }

    spec
}

/// Load a slicer mapping from disk.
///
/// A missing file is not an error: it yields an empty mapping, the
/// "no slicing configured" state.
pub fn load_slicer(path: &Path) -> Result<SliceSpec> {
    if !path.is_file() {
        return Ok(SliceSpec::new());
    }
    let text = std::fs::read_to_string(path).map_err(|e| MewError::Io {
        path: path.to_path_buf(),
        message: format!("Failed to read slicer mapping: {}", e),
    })?;
    Ok(parse_slicer(&text))
}

fn parse_block(block: &str) -> Vec<SliceRule> {
    let outputs: Vec<(std::ops::Range<usize>, String, String)> = OUTPUT_RE
        .captures_iter(block)
        .filter_map(|cap| {
            let whole = cap.get(0)?;
            Some((
                whole.range(),
                cap.get(1)?.as_str().to_string(),
                cap.get(2)?.as_str().to_string(),
            ))
        })
        .collect();

    let mut rules = Vec::new();
    for (i, (range, output, box_args)) in outputs.iter().enumerate() {
        let Some(bounds) = parse_box(box_args) else {
            continue;
        };

        // Metadata may only live between this output and the next one, so
        // a later output's payload never attaches to an earlier rule.
        let tail_end = outputs
            .get(i + 1)
            .map(|(next, _, _)| next.start)
            .unwrap_or(block.len());
        let metadata = extract_metadata(&block[range.end..tail_end]);

        rules.push(SliceRule {
            output: output.clone(),
            bounds,
            metadata,
        });
    }
    rules
}

fn parse_box(args: &str) -> Option<SpriteBox> {
    let cap = BOX_NUMS_RE.captures(args)?;
    let mut nums = [0u32; 6];
    for (slot, group) in nums.iter_mut().zip(1..=6) {
        *slot = cap.get(group)?.as_str().parse().ok()?;
    }
    let [x, y, w, h, ref_w, ref_h] = nums;
    // A zero reference dimension can never describe a real atlas; treat it
    // like any other malformed box.
    if ref_w == 0 || ref_h == 0 {
        return None;
    }
    Some(SpriteBox {
        x,
        y,
        w,
        h,
        ref_w,
        ref_h,
    })
}

/// Triple-quoted payloads take precedence over single-line strings.
fn extract_metadata(tail: &str) -> Option<String> {
    if let Some(cap) = METADATA_TRIPLE_RE.captures(tail) {
        return Some(cap.get(1)?.as_str().trim().to_string());
    }
    let cap = METADATA_SINGLE_RE.captures(tail)?;
    Some(cap.get(1)?.as_str().trim().to_string())
}
