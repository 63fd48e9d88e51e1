// ============================================================
// Layer 4 — Tokenization Pipeline
// ============================================================
// Renders and tokenizes every example of a split:
//
//   Example ──TemplateFormatter──▶ input_text ──tokenizer──▶ input_ids
//   Example.label_text ──────────────────────────tokenizer──▶ label_ids
//
// The result is a brand-new PreparedSplit. The source examples are
// only read, so the cached unprepared split stays valid for any
// other template.

use indicatif::{ProgressBar, ProgressStyle};

use crate::data::dataset::PreparedSplit;
use crate::data::formatter::TemplateFormatter;
use crate::domain::error::Result;
use crate::domain::example::{Example, PreparedExample};
use crate::domain::traits::TextTokenizer;

/// Render and tokenize one example.
pub fn prepare_example(
    formatter: &TemplateFormatter,
    tokenizer: &dyn TextTokenizer,
    example:   &Example,
) -> Result<PreparedExample> {
    let input_text = formatter.render(example)?;
    let input_ids  = tokenizer.encode(&input_text)?;
    let label_ids  = tokenizer.encode(&example.label_text)?;

    Ok(PreparedExample {
        example: example.clone(),
        input_text,
        input_ids,
        label_ids,
    })
}

/// Render and tokenize a whole split, optionally drawing a progress bar.
pub fn prepare_split(
    formatter:     &TemplateFormatter,
    tokenizer:     &dyn TextTokenizer,
    examples:      &[Example],
    show_progress: bool,
) -> Result<PreparedSplit> {
    let pb = if show_progress {
        let pb = ProgressBar::new(examples.len() as u64);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos:>6}/{len:6} ({eta})")
        {
            pb.set_style(style);
        }
        pb
    } else {
        ProgressBar::hidden()
    };

    let mut prepared = Vec::with_capacity(examples.len());
    for example in examples {
        prepared.push(prepare_example(formatter, tokenizer, example)?);
        pb.inc(1);
    }
    pb.finish_and_clear();

    let split = PreparedSplit::new(prepared);
    let (input_mean, label_mean) = split.mean_lengths();
    tracing::debug!(
        "Prepared {} examples (mean input {:.1} tokens, mean label {:.1} tokens)",
        split.example_count(),
        input_mean,
        label_mean,
    );

    Ok(split)
}
