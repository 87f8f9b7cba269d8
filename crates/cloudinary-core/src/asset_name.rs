//! Public identifier derivation from local paths.
//!
//! The combination
//!
//! ```text
//! path        = /tmp/css/default.css
//! base_dir    = /tmp/
//! prepend     = new/
//! ```
//!
//! yields `new/css/default`. Without a base directory the identifier is the
//! parent directory name plus the file stem, so `/tmp/images/logo.png` yields
//! `images/logo`.

use std::path::{Component, Path, PathBuf, MAIN_SEPARATOR};

/// Append a trailing `/` to `dirname` when it is missing.
pub fn ensure_trailing_slash(dirname: &str) -> String {
    if dirname.ends_with('/') {
        dirname.to_string()
    } else {
        format!("{}/", dirname)
    }
}

/// Derive the public identifier for `path`.
///
/// Both paths are made absolute (lexically, symlinks are not resolved) before
/// anything else. An empty `base_dir` means "no directory context".
pub fn clean_asset_name(path: &str, base_dir: &str, prepend: &str) -> String {
    let path = absolutize(Path::new(path.trim()));
    let base_dir = base_dir.trim();
    let base_dir = (!base_dir.is_empty()).then(|| absolutize(Path::new(base_dir)));

    public_id_for(&path, base_dir.as_deref(), prepend)
}

/// Same derivation as [`clean_asset_name`] for a path that is already absolute,
/// such as the path component of a remote URL.
pub fn public_id_for(path: &Path, base_dir: Option<&Path>, prepend: &str) -> String {
    let segments: Vec<String> = match base_dir.and_then(|base| path.strip_prefix(base).ok()) {
        Some(relative) => normal_segments(relative),
        None if base_dir.is_some() => normal_segments(path),
        None => {
            let all = normal_segments(path);
            let keep_from = all.len().saturating_sub(2);
            all[keep_from..].to_vec()
        }
    };

    let mut name = segments.join("/");
    if let Some(last) = segments.last() {
        let stem_len = Path::new(last)
            .file_stem()
            .map(|s| s.to_string_lossy().len())
            .unwrap_or(last.len());
        name.truncate(name.len() - (last.len() - stem_len));
    }

    let prepend = normalize_prepend(prepend);
    format!("{}{}", prepend, name)
}

fn normalize_prepend(prepend: &str) -> String {
    let prepend = prepend.trim();
    if prepend.is_empty() {
        return String::new();
    }
    let prepend = prepend.replace(MAIN_SEPARATOR, "/");
    ensure_trailing_slash(prepend.trim_start_matches('/'))
}

fn normal_segments(path: &Path) -> Vec<String> {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect()
}

/// Lexical absolute path: joins onto the working directory and folds `.` and `..`.
fn absolutize(path: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        match std::env::current_dir() {
            Ok(cwd) => cwd.join(path),
            Err(_) => path.to_path_buf(),
        }
    };

    let mut out = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_base_dir_keeps_parent_and_stem() {
        assert_eq!(clean_asset_name("/tmp/images/logo.png", "", ""), "images/logo");
    }

    #[test]
    fn test_base_dir_and_prepend() {
        assert_eq!(
            clean_asset_name("/tmp/css/default.css", "/tmp/", "new/"),
            "new/css/default"
        );
    }

    #[test]
    fn test_prepend_gets_trailing_slash_and_loses_leading_one() {
        assert_eq!(
            clean_asset_name("/tmp/css/default.css", "/tmp", "/static"),
            "static/css/default"
        );
    }

    #[test]
    fn test_extension_stripped_once() {
        assert_eq!(
            clean_asset_name("/data/dist/app.min.js", "/data", ""),
            "dist/app.min"
        );
        assert_eq!(
            clean_asset_name("/data/archives/backup.tar.gz", "", ""),
            "archives/backup.tar"
        );
    }

    #[test]
    fn test_dotted_directory_does_not_lose_extension_logic() {
        assert_eq!(
            clean_asset_name("/srv/v1.2/readme", "/srv", ""),
            "v1.2/readme"
        );
    }

    #[test]
    fn test_nested_relative_to_base() {
        assert_eq!(
            clean_asset_name("/assets/img/icons/small/star.svg", "/assets/img", "site"),
            "site/icons/small/star"
        );
    }

    #[test]
    fn test_parent_dir_segments_folded() {
        assert_eq!(
            clean_asset_name("/tmp/x/../images/./logo.png", "", ""),
            "images/logo"
        );
    }

    #[test]
    fn test_single_segment_path() {
        assert_eq!(clean_asset_name("/logo.png", "", ""), "logo");
    }

    #[test]
    fn test_relative_path_uses_working_directory() {
        assert_eq!(clean_asset_name("images/logo.png", "", ""), "images/logo");
        // Relative base and path resolve against the same directory.
        assert_eq!(
            clean_asset_name("images/sub/logo.png", "images", ""),
            "sub/logo"
        );
    }

    #[test]
    fn test_url_path_derivation() {
        assert_eq!(
            public_id_for(Path::new("/demo/image/upload/v1584624255/sample.jpg"), None, ""),
            "v1584624255/sample"
        );
    }

    #[test]
    fn test_ensure_trailing_slash() {
        assert_eq!(ensure_trailing_slash("dir"), "dir/");
        assert_eq!(ensure_trailing_slash("dir/"), "dir/");
        assert_eq!(ensure_trailing_slash(""), "/");
    }
}
