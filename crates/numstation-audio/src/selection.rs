//! Sample selection: glob expansion and seeded random choice.
//!
//! Randomness is always injected so a run can be replayed from its seed.

use std::path::PathBuf;

use glob::MatchOptions;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::error::{WavError, WavResult};

/// Creates a PCG32 RNG from a seed.
pub fn create_rng(seed: u64) -> Pcg32 {
    Pcg32::seed_from_u64(seed)
}

/// Draws a fresh seed from the thread RNG.
pub fn entropy_seed() -> u64 {
    rand::random()
}

/// Expands a glob pattern into a sorted list of regular files.
///
/// `**` matches across directories. Like shell globbing, wildcards do not
/// match a leading `.` in a file name.
pub fn resolve_glob(pattern: &str) -> WavResult<Vec<PathBuf>> {
    let options = MatchOptions {
        case_sensitive: true,
        require_literal_separator: false,
        require_literal_leading_dot: true,
    };
    let entries = glob::glob_with(pattern, options).map_err(|source| WavError::Pattern {
        pattern: pattern.to_string(),
        source,
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| {
            let path = e.path().to_path_buf();
            WavError::read(path, e.into_error())
        })?;
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();

    if files.is_empty() {
        return Err(WavError::invalid_argument(format!(
            "no sample files match '{}'",
            pattern
        )));
    }
    Ok(files)
}

/// Picks `count` candidates uniformly at random, with replacement.
pub fn choose_samples<R: Rng + ?Sized>(
    candidates: &[PathBuf],
    count: usize,
    rng: &mut R,
) -> WavResult<Vec<PathBuf>> {
    if candidates.is_empty() {
        return Err(WavError::invalid_argument("no candidate sample files"));
    }
    if count == 0 {
        return Err(WavError::invalid_argument("sample count must be at least 1"));
    }

    Ok((0..count)
        .map(|_| candidates[rng.gen_range(0..candidates.len())].clone())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn paths(names: &[&str]) -> Vec<PathBuf> {
        names.iter().map(PathBuf::from).collect()
    }

    #[test]
    fn test_same_seed_same_choice() {
        let candidates = paths(&["0.wav", "1.wav", "2.wav", "3.wav", "4.wav"]);
        let a = choose_samples(&candidates, 16, &mut create_rng(42)).unwrap();
        let b = choose_samples(&candidates, 16, &mut create_rng(42)).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 16);
        assert!(a.iter().all(|p| candidates.contains(p)));
    }

    #[test]
    fn test_choice_is_with_replacement() {
        let candidates = paths(&["only.wav"]);
        let chosen = choose_samples(&candidates, 3, &mut create_rng(7)).unwrap();
        assert_eq!(chosen, paths(&["only.wav", "only.wav", "only.wav"]));
    }

    #[test]
    fn test_choice_rejects_empty_inputs() {
        let mut rng = create_rng(1);
        assert!(matches!(
            choose_samples(&[], 4, &mut rng).unwrap_err(),
            WavError::InvalidArgument { .. }
        ));
        assert!(matches!(
            choose_samples(&paths(&["a.wav"]), 0, &mut rng).unwrap_err(),
            WavError::InvalidArgument { .. }
        ));
    }

    #[test]
    fn test_resolve_glob_recursive_and_sorted() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("en/b")).unwrap();
        fs::write(dir.path().join("en/2.wav"), b"").unwrap();
        fs::write(dir.path().join("en/b/1.wav"), b"").unwrap();
        fs::write(dir.path().join("en/.hidden.wav"), b"").unwrap();
        fs::write(dir.path().join("en/notes.txt"), b"").unwrap();

        let pattern = format!("{}/**/*.wav", dir.path().display());
        let found = resolve_glob(&pattern).unwrap();
        assert_eq!(
            found,
            vec![dir.path().join("en/2.wav"), dir.path().join("en/b/1.wav")]
        );
    }

    #[test]
    fn test_resolve_glob_no_match() {
        let dir = tempfile::tempdir().unwrap();
        let pattern = format!("{}/*.wav", dir.path().display());
        let err = resolve_glob(&pattern).unwrap_err();
        assert!(matches!(err, WavError::InvalidArgument { .. }));
    }

    #[test]
    fn test_resolve_glob_bad_pattern() {
        let err = resolve_glob("samples/***.wav").unwrap_err();
        assert!(matches!(err, WavError::Pattern { .. }));
    }
}
