//! Claim file IO.

use anyhow::Context;
use attest_types::ClaimRoot;
use camino::Utf8Path;

/// Pretty JSON with two-space indentation and a trailing newline.
pub fn serialize_claim(root: &ClaimRoot) -> anyhow::Result<String> {
    let mut text = serde_json::to_string_pretty(root).context("serialize claim")?;
    text.push('\n');
    Ok(text)
}

pub fn read_claim(path: &Utf8Path) -> anyhow::Result<ClaimRoot> {
    let text = std::fs::read_to_string(path).with_context(|| format!("read claim {path}"))?;
    serde_json::from_str(&text).with_context(|| format!("parse claim {path}"))
}

pub fn write_claim(path: &Utf8Path, root: &ClaimRoot) -> anyhow::Result<()> {
    write_text(path, &serialize_claim(root)?)
}

/// Write `text` to `path`, creating parent directories.
pub fn write_text(path: &Utf8Path, text: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_str().is_empty()
    {
        std::fs::create_dir_all(parent).with_context(|| format!("create dir {parent}"))?;
    }
    std::fs::write(path, text).with_context(|| format!("write {path}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use attest_types::Claim;

    #[test]
    fn write_then_read_preserves_claim() {
        let tmp = tempfile::tempdir().expect("temp dir");
        let dir = Utf8Path::from_path(tmp.path()).expect("utf8 path");
        let path = dir.join("nested/out/claim.json");

        let mut root = ClaimRoot::default();
        root.claim.versions.tool = "1.2.3".to_string();
        root.claim
            .raw_results
            .insert("cnf-features".to_string(), serde_json::json!({"passed": 3}));

        write_claim(&path, &root).expect("write");
        let back = read_claim(&path).expect("read");
        assert_eq!(back, root);
    }

    #[test]
    fn output_is_indented_with_two_spaces() {
        let text = serialize_claim(&ClaimRoot {
            claim: Claim::default(),
        })
        .expect("serialize");
        assert!(text.starts_with("{\n  \"claim\": {\n    \""));
        assert!(text.ends_with("}\n"));
    }

    #[test]
    fn read_reports_path_on_missing_file() {
        let err = read_claim(Utf8Path::new("/definitely/not/here/claim.json")).unwrap_err();
        assert!(format!("{err:#}").contains("/definitely/not/here/claim.json"));
    }
}
