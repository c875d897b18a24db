//! Writing curvature samples.

use crate::{num::BFloat, sampling::CurvatureSample};
use std::io::{self, Write};

#[cfg(feature = "json")]
use std::{fs, path::Path};

/// Formats a sample as a single line of text, without line terminator.
pub fn format_sample_line<F: BFloat>(sample: &CurvatureSample<F>) -> String {
    format!(
        "Distance: {}\tCurvature: {}",
        sample.distance, sample.average_curvature
    )
}

/// Writes a single sample as a line of text to the given writer.
pub fn write_sample_as_text<F, W>(writer: &mut W, sample: &CurvatureSample<F>) -> io::Result<()>
where
    F: BFloat,
    W: Write,
{
    writeln!(writer, "{}", format_sample_line(sample))
}

/// Serializes the given samples into a JSON array and writes to the given writer.
#[cfg(feature = "json")]
pub fn write_samples_as_json<F, W>(writer: &mut W, samples: &[CurvatureSample<F>]) -> io::Result<()>
where
    F: BFloat + serde::Serialize,
    W: Write,
{
    serde_json::to_writer(&mut *writer, samples).map_err(io::Error::from)?;
    writer.flush()
}

/// Serializes the given samples into a JSON array and saves at the given path.
#[cfg(feature = "json")]
pub fn save_samples_as_json<F, P>(output_file_path: P, samples: &[CurvatureSample<F>]) -> io::Result<()>
where
    F: BFloat + serde::Serialize,
    P: AsRef<Path>,
{
    let mut writer = io::BufWriter::new(fs::File::create(output_file_path)?);
    write_samples_as_json(&mut writer, samples)
}
