//! Hash domain governance lock tests.
//!
//! Proves:
//! 1. Canonical domain set has the expected count (catches forgotten
//!    additions to `ALL`)
//! 2. All domain byte strings are unique
//! 3. All domains are null-terminated and follow `CUBIST::*::V1\0`
//! 4. No raw `CUBIST::` domain literals in production source outside
//!    `proof/hash.rs`

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use cubist_kernel::proof::hash::HashDomain;

#[test]
fn hash_domain_canonical_set_count() {
    assert_eq!(
        HashDomain::ALL.len(),
        4,
        "if you added a new domain, update this count"
    );
}

#[test]
fn hash_domain_all_unique_bytes() {
    let mut seen = BTreeSet::new();
    for domain in HashDomain::ALL {
        assert!(
            seen.insert(domain.as_bytes()),
            "duplicate domain bytes: {domain:?}"
        );
    }
}

#[test]
fn hash_domain_naming_convention() {
    for domain in HashDomain::ALL {
        let bytes = domain.as_bytes();
        assert!(bytes.starts_with(b"CUBIST::"), "{domain:?}");
        assert!(bytes.ends_with(b"::V1\0"), "{domain:?}");
        assert_eq!(
            bytes.iter().filter(|&&b| b == 0).count(),
            1,
            "{domain:?} must contain exactly one NUL, at the end"
        );
    }
}

#[test]
fn no_raw_domain_literals_outside_authority() {
    let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("../..");
    let pattern = "b\"CUBIST::";
    let mut violations = Vec::new();

    for crate_dir in ["kernel", "search", "harness"] {
        let src = root.join(crate_dir).join("src");
        assert!(src.is_dir(), "missing {}", src.display());
        for path in rust_files(&src) {
            if path.ends_with("proof/hash.rs") {
                continue;
            }
            let content = std::fs::read_to_string(&path).unwrap();
            for (i, line) in production_lines(&content) {
                if line.contains(pattern) {
                    violations.push(format!("  {}:{}: {}", path.display(), i + 1, line.trim()));
                }
            }
        }
    }

    assert!(
        violations.is_empty(),
        "raw CUBIST:: domain literals found outside proof/hash.rs:\n{}",
        violations.join("\n")
    );
}

/// Lines outside `#[cfg(test)]` blocks and line comments.
fn production_lines(content: &str) -> Vec<(usize, &str)> {
    let mut out = Vec::new();
    let mut depth = 0_usize;
    let mut skip_below: Option<usize> = None;
    let mut cfg_test_pending = false;
    for (i, line) in content.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.contains("#[cfg(test)]") {
            cfg_test_pending = true;
            continue;
        }
        let opens = line.matches('{').count();
        let closes = line.matches('}').count();
        if cfg_test_pending && opens > 0 {
            skip_below = Some(depth);
            cfg_test_pending = false;
        }
        depth = depth.saturating_add(opens).saturating_sub(closes);
        if let Some(base) = skip_below {
            if depth <= base {
                skip_below = None;
            }
            continue;
        }
        if !trimmed.starts_with("//") {
            out.push((i, line));
        }
    }
    out
}

fn rust_files(dir: &Path) -> Vec<PathBuf> {
    let mut out = Vec::new();
    for entry in std::fs::read_dir(dir).unwrap().flatten() {
        let path = entry.path();
        if path.is_dir() {
            out.extend(rust_files(&path));
        } else if path.extension().is_some_and(|ext| ext == "rs") {
            out.push(path);
        }
    }
    out
}
