//! Reading corpora from line-oriented files.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use super::{Corpus, CorpusBuilder, CorpusError, Split};

/// Feed every line of `reader` into the builder. Returns the number of
/// lines kept.
pub fn read_lines<R: BufRead>(
    builder: &mut CorpusBuilder,
    split: Split,
    reader: R,
    path: &Path,
) -> Result<usize, CorpusError> {
    let mut kept = 0;
    for line in reader.lines() {
        let line = line.map_err(|source| CorpusError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        if builder.push_line(split, &line) {
            kept += 1;
        }
    }
    Ok(kept)
}

/// Load training and test files restricted to the two categories.
///
/// The training file is read first, so its terms get the lowest vocabulary
/// indices.
pub fn load_corpus(
    training_path: &Path,
    test_path: &Path,
    categories: [String; 2],
) -> Result<Corpus, CorpusError> {
    let mut builder = CorpusBuilder::new(categories);

    for (split, path) in [(Split::Training, training_path), (Split::Test, test_path)] {
        let file = File::open(path).map_err(|source| CorpusError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let kept = read_lines(&mut builder, split, BufReader::new(file), path)?;
        tracing::debug!(
            path = %path.display(),
            split = ?split,
            documents = kept,
            "corpus file loaded"
        );
    }

    builder.build()
}
