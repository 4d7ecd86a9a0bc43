//! Keeps `tests/unit` a mirror of `src` and every test file non-empty

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::fs;
    use std::io;
    use std::path::Path;

    // Crate roots and module declarations carry no logic of their own
    fn is_organizational(relative_path: &str) -> bool {
        let file_name = Path::new(relative_path)
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or_default();
        matches!(file_name, "main.rs" | "lib.rs" | "mod.rs")
    }

    fn mirrored_paths() -> (HashSet<String>, HashSet<String>) {
        let src_dir = Path::new("src");
        let tests_dir = Path::new("tests/unit");

        let src_paths = collect_relative_paths(src_dir, src_dir).unwrap_or_else(|error| {
            assert!(!src_dir.exists(), "Failed to read src directory: {error}");
            HashSet::new()
        });
        let test_paths = collect_relative_paths(tests_dir, tests_dir).unwrap_or_default();

        (src_paths, test_paths)
    }

    // Tests every source module has a unit test file at the mirrored path
    // Verified by deleting tests/unit/raster/mask.rs
    #[test]
    fn test_all_src_files_have_unit_tests() {
        let (src_paths, test_paths) = mirrored_paths();

        let mut missing_tests: Vec<&String> = src_paths
            .iter()
            .filter(|path| !is_organizational(path) && !test_paths.contains(*path))
            .collect();
        missing_tests.sort();

        assert!(
            missing_tests.is_empty(),
            "The following src files/directories are missing unit test counterparts:\n{}",
            missing_tests
                .iter()
                .map(|src_path| format!("  - src/{src_path} -> tests/unit/{src_path}"))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }

    // Tests no unit test file outlives its source module
    // Verified by adding tests/unit/raster/dither.rs
    #[test]
    fn test_all_unit_tests_have_src_counterparts() {
        let (src_paths, test_paths) = mirrored_paths();

        let mut orphaned_tests: Vec<&String> = test_paths
            .iter()
            .filter(|path| !is_organizational(path) && !src_paths.contains(*path))
            .collect();
        orphaned_tests.sort();

        assert!(
            orphaned_tests.is_empty(),
            "The following unit test files/directories have no corresponding src files:\n{}",
            orphaned_tests
                .iter()
                .map(|test_path| format!("  - tests/unit/{test_path} -> src/{test_path} (missing)"))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }

    fn collect_relative_paths(dir: &Path, base: &Path) -> Result<HashSet<String>, io::Error> {
        let mut paths = HashSet::new();

        if dir.is_dir() {
            for entry_result in fs::read_dir(dir)? {
                let path = entry_result?.path();

                let relative_path = path
                    .strip_prefix(base)
                    .map_err(|_prefix_error| io::Error::other("Failed to strip prefix"))?
                    .to_string_lossy()
                    .to_string();

                if path.is_dir() {
                    paths.insert(relative_path);
                    paths.extend(collect_relative_paths(&path, base)?);
                } else if path.extension().and_then(|ext| ext.to_str()) == Some("rs") {
                    paths.insert(relative_path);
                }
            }
        }

        Ok(paths)
    }

    // Tests every test file declares at least one test
    // Verified by emptying tests/unit/io/logging.rs
    #[test]
    fn test_all_test_files_contain_tests() {
        let tests_dir = Path::new("tests");
        let mut files_without_tests = Vec::new();

        if let Err(error) = check_test_files(tests_dir, &mut files_without_tests) {
            assert!(!tests_dir.exists(), "Failed to scan tests directory: {error}");
        }
        files_without_tests.sort();

        assert!(
            files_without_tests.is_empty(),
            "The following test files don't contain any #[test] functions:\n{}",
            files_without_tests.join("\n")
        );
    }

    fn check_test_files(dir: &Path, files_without_tests: &mut Vec<String>) -> Result<(), io::Error> {
        for entry_result in fs::read_dir(dir)? {
            let path = entry_result?.path();

            if path.is_dir() {
                check_test_files(&path, files_without_tests)?;
                continue;
            }
            if path.extension().and_then(|ext| ext.to_str()) != Some("rs")
                || is_organizational(&path.to_string_lossy())
            {
                continue;
            }

            if !fs::read_to_string(&path)?.contains("#[test]") {
                files_without_tests.push(format!("  - {}", path.display()));
            }
        }

        Ok(())
    }
}
