//! Line-oriented text record for a fractal configuration.
//!
//! ```text
//! julia
//! complexConstant -0.7 0.27015
//! iterationFunction none
//! xMin -1
//! xMax 1
//! yMin -1
//! yMax 1
//! discreteStep 0.00075
//! imageWidth 2667
//! imageHeight 2667
//! fileName Julia
//! colorFunction 20 1 1
//! maxIteration 1000
//! ```
//!
//! A Mandelbrot record omits the `complexConstant` and `iterationFunction`
//! lines. Floats are written in Rust's shortest round-trip form, so
//! `decode(encode(c)) == c` bit for bit. `iterationFunction` is either
//! `none` or `alphaRe alphaIm betaRe betaIm`.

use std::str::FromStr;

use tracing::debug;

use crate::complex::Complex;
use crate::config::{ColorFunction, FractalConfig, FractalOptions, FractalType, IterationFunction};
use crate::error::CoreError;

const NONE: &str = "none";

/// Serialize `config` to its text record (newline terminated).
pub fn encode(config: &FractalConfig) -> String {
    let mut out = format!("{}\n", config.fractal_type().name());

    if let Some(j) = config.julia_params() {
        out.push_str(&format!("complexConstant {} {}\n", j.constant.re, j.constant.im));
        match j.iteration_function {
            Some(f) => out.push_str(&format!(
                "iterationFunction {} {} {} {}\n",
                f.alpha.re, f.alpha.im, f.beta.re, f.beta.im
            )),
            None => out.push_str(&format!("iterationFunction {NONE}\n")),
        }
    }

    out.push_str(&format!("xMin {}\n", config.x_min()));
    out.push_str(&format!("xMax {}\n", config.x_max()));
    out.push_str(&format!("yMin {}\n", config.y_min()));
    out.push_str(&format!("yMax {}\n", config.y_max()));
    out.push_str(&format!("discreteStep {}\n", config.discrete_step()));
    out.push_str(&format!("imageWidth {}\n", config.image_width()));
    out.push_str(&format!("imageHeight {}\n", config.image_height()));
    out.push_str(&format!("fileName {}\n", config.file_name()));
    let color = config.color();
    out.push_str(&format!(
        "colorFunction {} {} {}\n",
        color.alpha, color.beta, color.gamma
    ));
    out.push_str(&format!("maxIteration {}\n", config.max_iteration()));
    out
}

/// Parse a text record back into a configuration.
///
/// Any deviation (unknown tag, missing or reordered key, malformed number,
/// trailing data, or values the builder rejects) yields
/// [`CoreError::CorruptFractalFile`]; no partial configuration escapes.
pub fn decode(text: &str) -> crate::Result<FractalConfig> {
    let mut fields = Fields::new(text);

    let tag = fields.next_line()?;
    let fractal_type = FractalType::from_str(tag)
        .map_err(|_| CoreError::corrupt(format!("unknown fractal type '{tag}'")))?;

    let mut options = FractalOptions::default();
    if fractal_type == FractalType::Julia {
        let [re, im] = parse_floats::<2>(fields.expect("complexConstant")?, "complexConstant")?;
        options.complex_constant = Some(Complex::new(re, im));

        let value = fields.expect("iterationFunction")?;
        if value != NONE {
            let [ar, ai, br, bi] = parse_floats::<4>(value, "iterationFunction")?;
            options.iteration_function = Some(IterationFunction::new(
                Complex::new(ar, ai),
                Complex::new(br, bi),
            ));
        }
    }

    options.x_min = Some(parse_one(fields.expect("xMin")?, "xMin")?);
    options.x_max = Some(parse_one(fields.expect("xMax")?, "xMax")?);
    options.y_min = Some(parse_one(fields.expect("yMin")?, "yMin")?);
    options.y_max = Some(parse_one(fields.expect("yMax")?, "yMax")?);
    options.discrete_step = Some(parse_one(fields.expect("discreteStep")?, "discreteStep")?);
    options.image_width = Some(parse_one(fields.expect("imageWidth")?, "imageWidth")?);
    options.image_height = Some(parse_one(fields.expect("imageHeight")?, "imageHeight")?);
    options.file_name = Some(fields.expect("fileName")?.to_string());
    let [alpha, beta, gamma] = parse_floats::<3>(fields.expect("colorFunction")?, "colorFunction")?;
    options.color = Some(ColorFunction::new(alpha, beta, gamma));
    options.max_iteration = Some(parse_one(fields.expect("maxIteration")?, "maxIteration")?);

    fields.finish()?;

    let config = FractalConfig::build(fractal_type, options).map_err(|e| match e {
        CoreError::InvalidConfiguration { reason } => CoreError::CorruptFractalFile { reason },
        CoreError::MissingRequiredParameter(name) => {
            CoreError::corrupt(format!("missing required parameter {name}"))
        }
        other => other,
    })?;
    debug!(fractal = %fractal_type, file_name = config.file_name(), "Decoded fractal record");
    Ok(config)
}

/// Sequential cursor over the record's lines.
struct Fields<'a> {
    lines: std::str::Lines<'a>,
}

impl<'a> Fields<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            lines: text.lines(),
        }
    }

    fn next_line(&mut self) -> crate::Result<&'a str> {
        self.lines
            .next()
            .ok_or_else(|| CoreError::corrupt("unexpected end of record"))
    }

    /// Consume the next line, which must be `key value`, and return `value`.
    fn expect(&mut self, key: &str) -> crate::Result<&'a str> {
        let line = self.next_line()?;
        match line.split_once(' ') {
            Some((k, value)) if k == key => Ok(value),
            _ => Err(CoreError::corrupt(format!("expected '{key}', found '{line}'"))),
        }
    }

    /// Only blank lines may follow the last field.
    fn finish(mut self) -> crate::Result<()> {
        match self.lines.find(|l| !l.trim().is_empty()) {
            Some(extra) => Err(CoreError::corrupt(format!("unexpected trailing line '{extra}'"))),
            None => Ok(()),
        }
    }
}

fn parse_one<T: FromStr>(value: &str, key: &str) -> crate::Result<T> {
    value
        .parse()
        .map_err(|_| CoreError::corrupt(format!("malformed {key} value '{value}'")))
}

fn parse_floats<const N: usize>(value: &str, key: &str) -> crate::Result<[f64; N]> {
    let mut out = [0.0; N];
    let mut parts = value.split(' ');
    for slot in out.iter_mut() {
        let part = parts
            .next()
            .ok_or_else(|| CoreError::corrupt(format!("{key} needs {N} numbers, got '{value}'")))?;
        *slot = parse_one(part, key)?;
    }
    if parts.next().is_some() {
        return Err(CoreError::corrupt(format!(
            "{key} needs {N} numbers, got '{value}'"
        )));
    }
    Ok(out)
}
