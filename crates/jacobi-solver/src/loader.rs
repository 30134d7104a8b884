//! Problem file reader and writer.
//!
//! The format is a whitespace-separated token stream:
//!
//! ```text
//! ORDER TEST_ROW TOLERANCE MAX_ITERATIONS
//! a00 a01 ... a0(n-1)
//! ...
//! a(n-1)0 ... a(n-1)(n-1)
//! b0 b1 ... b(n-1)
//! ```
//!
//! Line breaks carry no meaning. Tokens after the last rhs entry are ignored
//! with a warning. The worker count is not part of the file; callers supply it.

use std::fs::File;
use std::io::{self, BufReader, Read, Write};
use std::path::Path;
use std::str::{FromStr, SplitWhitespace};

use tracing::{instrument, warn};

use crate::error::{LoadError, ValidationError};
use crate::types::{DenseMatrix, LinearSystem};
use crate::validation::MAX_ORDER;

/// Largest number of matrix values reserved before any are read, so a
/// malicious header cannot force a huge allocation up front.
const PREALLOC_LIMIT: usize = 1 << 20;

struct Tokens<'a> {
    inner: SplitWhitespace<'a>,
    position: usize,
}

impl<'a> Tokens<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            inner: input.split_whitespace(),
            position: 0,
        }
    }

    fn next<T: FromStr>(&mut self, expected: impl FnOnce() -> String) -> Result<T, LoadError> {
        let token = self
            .inner
            .next()
            .ok_or_else(|| LoadError::UnexpectedEof {
                expected: expected(),
            })?;
        let position = self.position;
        self.position += 1;
        token.parse().map_err(|_| LoadError::InvalidNumber {
            token: token.to_string(),
            position,
        })
    }

    fn remaining(self) -> usize {
        self.inner.count()
    }
}

/// Parse a problem from its textual form.
///
/// # Errors
///
/// Returns [`LoadError`] if a token is missing or malformed, or if the parsed
/// problem fails [`LinearSystem::new`] validation.
///
/// # Example
///
/// ```
/// use jacobi_solver::loader::parse_system;
///
/// let text = "2 0 1e-6 50\n 2 1\n 1 3\n 3 4\n";
/// let system = parse_system(text, 1).unwrap();
/// assert_eq!(system.order(), 2);
/// assert_eq!(system.rhs(), &[3.0, 4.0]);
/// ```
#[instrument(skip(input), fields(bytes = input.len()))]
pub fn parse_system(input: &str, workers: usize) -> Result<LinearSystem, LoadError> {
    let mut tokens = Tokens::new(input);

    let order: usize = tokens.next(|| "matrix order".into())?;
    let test_row: usize = tokens.next(|| "test row index".into())?;
    let tolerance: f64 = tokens.next(|| "error tolerance".into())?;
    let max_iterations: usize = tokens.next(|| "iteration limit".into())?;

    if order == 0 {
        return Err(ValidationError::ParameterOutOfRange {
            name: "order".into(),
            value: "0".into(),
            expected: ">= 1".into(),
        }
        .into());
    }
    if order > MAX_ORDER {
        return Err(ValidationError::MatrixTooLarge {
            order,
            max_order: MAX_ORDER,
        }
        .into());
    }

    let mut values = Vec::with_capacity((order * order).min(PREALLOC_LIMIT));
    for i in 0..order {
        for j in 0..order {
            values.push(tokens.next(|| format!("matrix entry [{i}][{j}]"))?);
        }
    }
    let mut rhs = Vec::with_capacity(order.min(PREALLOC_LIMIT));
    for i in 0..order {
        rhs.push(tokens.next(|| format!("rhs entry [{i}]"))?);
    }

    let trailing = tokens.remaining();
    if trailing > 0 {
        warn!(trailing, "ignoring trailing tokens after rhs vector");
    }

    let matrix = DenseMatrix::from_row_major(order, values)?;
    Ok(LinearSystem::new(
        matrix,
        rhs,
        test_row,
        tolerance,
        max_iterations,
        workers,
    )?)
}

/// Read and parse a problem from any reader.
///
/// # Errors
///
/// Returns [`LoadError::Io`] if reading fails, otherwise as [`parse_system`].
pub fn read_system<R: Read>(mut reader: R, workers: usize) -> Result<LinearSystem, LoadError> {
    let mut input = String::new();
    reader.read_to_string(&mut input)?;
    parse_system(&input, workers)
}

/// Read and parse a problem file.
///
/// # Errors
///
/// As [`read_system`].
pub fn load_system(path: impl AsRef<Path>, workers: usize) -> Result<LinearSystem, LoadError> {
    let file = File::open(path.as_ref())?;
    read_system(BufReader::new(file), workers)
}

/// Write `system` in the problem file format.
///
/// Values are written with Rust's shortest round-trip float formatting, so
/// [`parse_system`] reads back the identical system.
pub fn write_system<W: Write>(system: &LinearSystem, mut writer: W) -> io::Result<()> {
    writeln!(
        writer,
        "{} {} {:e} {}",
        system.order(),
        system.test_row(),
        system.tolerance(),
        system.max_iterations(),
    )?;
    for i in 0..system.order() {
        let row: Vec<String> = system.matrix().row(i).iter().map(f64::to_string).collect();
        writeln!(writer, "{}", row.join(" "))?;
    }
    let rhs: Vec<String> = system.rhs().iter().map(f64::to_string).collect();
    writeln!(writer, "{}", rhs.join(" "))?;
    writer.flush()
}
