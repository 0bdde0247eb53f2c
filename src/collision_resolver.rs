use anyhow::{bail, Result};
use std::path::Path;

/// Upper bound on the rename loop; exceeding it is an internal error.
const MAX_ATTEMPTS: usize = 10_000;

/// Produces a file name not currently present in `dir` by repeatedly
/// inserting an underscore before the final extension separator
/// (`name.ext` -> `name_.ext` -> `name__.ext` -> ...). Existence is
/// re-checked after every mutation, so a variant that happens to exist
/// already is skipped over. Callers invoke this only when `desired`
/// itself is occupied, so at least one mutation is always applied.
pub fn resolve_free_name(dir: &Path, desired: &str) -> Result<String> {
    let mut name = desired.to_string();
    for _ in 0..MAX_ATTEMPTS {
        name = insert_underscore(&name);
        if !dir.join(&name).exists() {
            return Ok(name);
        }
    }
    bail!(
        "no free variant of {} found in {} after {} attempts",
        desired,
        dir.display(),
        MAX_ATTEMPTS
    );
}

fn insert_underscore(name: &str) -> String {
    match name.rfind('.') {
        Some(dot) => format!("{}_{}", &name[..dot], &name[dot..]),
        None => format!("{}_", name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::fs;
    use std::path::PathBuf;

    fn setup(test_name: &str, existing: &[&str]) -> PathBuf {
        let dir = PathBuf::from("/tmp").join(test_name);
        fs::remove_dir_all(&dir).ok();
        fs::create_dir_all(&dir).unwrap();
        for name in existing {
            fs::write(dir.join(name), b"x").unwrap();
        }
        dir
    }

    #[rstest]
    #[case(&["a.jpg"], "a_.jpg")]
    #[case(&["a.jpg", "a_.jpg"], "a__.jpg")]
    #[case(&["a.jpg", "a_.jpg", "a__.jpg"], "a___.jpg")]
    fn test_one_underscore_per_existing_variant(
        #[case] existing: &[&str],
        #[case] expected: &str,
    ) {
        // Arrange
        let dir = setup(&format!("test_resolver_{}", existing.len()), existing);

        // Act
        let free = resolve_free_name(&dir, "a.jpg").unwrap();

        // Assert
        assert_eq!(free, expected);
        assert!(!dir.join(&free).exists());

        // Cleanup
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_underscore_goes_before_the_last_dot() {
        // Arrange
        let dir = setup("test_resolver_last_dot", &["a.b.jpg"]);

        // Act
        let free = resolve_free_name(&dir, "a.b.jpg").unwrap();

        // Assert
        assert_eq!(free, "a.b_.jpg");

        // Cleanup
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_name_without_extension_gets_trailing_underscore() {
        // Arrange
        let dir = setup("test_resolver_no_ext", &["noext"]);

        // Act
        let free = resolve_free_name(&dir, "noext").unwrap();

        // Assert
        assert_eq!(free, "noext_");

        // Cleanup
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_mutation_is_applied_even_when_desired_is_free() {
        // Arrange
        let dir = setup("test_resolver_always_mutates", &[]);

        // Act
        let free = resolve_free_name(&dir, "a.jpg").unwrap();

        // Assert
        assert_eq!(free, "a_.jpg");

        // Cleanup
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_pre_existing_mutated_variant_is_skipped() {
        // Arrange: a_.jpg already exists, a.jpg does not
        let dir = setup("test_resolver_gap", &["a_.jpg"]);

        // Act
        let free = resolve_free_name(&dir, "a.jpg").unwrap();

        // Assert
        assert_eq!(free, "a__.jpg");

        // Cleanup
        fs::remove_dir_all(&dir).ok();
    }
}
