//! # 公共根目录解析
//!
//! 计算一组文件路径最深的公共祖先目录，并把路径改写为相对该目录的形式。
//!
//! ## 规则
//! - 空输入返回空字符串（表示"在当前位置操作"）
//! - 每个路径的最后一段视为文件名，不参与比较，结果总是目录
//! - 比较窗口取最短路径的段数，因此结果与输入顺序无关
//! - 没有公共目录时返回 `"."`
//!
//! ## 依赖关系
//! - 被 `batch/runner.rs` 和 `commands/root.rs` 使用
//! - 纯字符串运算，不访问文件系统

use std::path::{Path, PathBuf};

/// 路径分隔符
pub const SEP: char = '/';

/// 计算公共根目录
pub fn common_root<S: AsRef<str>>(paths: &[S]) -> String {
    if paths.is_empty() {
        return String::new();
    }

    let split: Vec<Vec<&str>> = paths
        .iter()
        .map(|p| p.as_ref().split(SEP).collect())
        .collect();

    // 排除文件名段
    let window = split.iter().map(|s| s.len()).min().unwrap_or(0).saturating_sub(1);

    let mut common = String::new();
    for i in 0..window {
        let segment = split[0][i];
        if !split.iter().all(|s| s[i] == segment) {
            break;
        }
        common.push_str(segment);
        common.push(SEP);
    }

    normalize(&common)
}

/// 规范化路径：折叠重复分隔符、`.` 段，并尽可能消解 `..`
///
/// 保留绝对路径前缀和末尾分隔符，空结果返回 `"."`。
pub fn normalize(path: &str) -> String {
    if path.is_empty() {
        return ".".to_string();
    }

    let absolute = path.starts_with(SEP);
    let trailing = path.ends_with(SEP);
    let segments = resolve_segments(path, absolute);

    let mut result = segments.join(&SEP.to_string());
    if result.is_empty() && !absolute {
        result.push('.');
    }
    if !result.is_empty() && trailing {
        result.push(SEP);
    }

    if absolute {
        format!("{}{}", SEP, result)
    } else {
        result
    }
}

/// 将 `path` 改写为相对 `root` 的路径，满足 `join(root, rel)` 指向 `path`
///
/// - `path` 不在 `root` 下时用 `..` 回退到公共部分
/// - `path` 为绝对路径而 `root` 为相对路径时，返回规范化后的绝对路径
pub fn relative_to(root: &str, path: &str) -> String {
    let root_absolute = root.starts_with(SEP);
    let path_absolute = path.starts_with(SEP);
    if root_absolute != path_absolute {
        return normalize(path).trim_end_matches(SEP).to_string();
    }

    let root_segments = resolve_segments(root, root_absolute);
    let path_segments = resolve_segments(path, path_absolute);

    let shared = root_segments
        .iter()
        .zip(&path_segments)
        .take_while(|(a, b)| a == b)
        .count();

    // 根目录剩余部分以 `..` 开头时无法用 `..` 回退
    if root_segments[shared..].contains(&"..") {
        return normalize(path).trim_end_matches(SEP).to_string();
    }

    let mut parts: Vec<&str> = vec![".."; root_segments.len() - shared];
    parts.extend_from_slice(&path_segments[shared..]);
    if parts.is_empty() {
        return ".".to_string();
    }
    parts.join(&SEP.to_string())
}

/// 把相对路径放回根目录下，`root` 为空或 `"."` 时原样返回
pub fn join(root: &str, relative: &str) -> PathBuf {
    if root.is_empty() || root == "." || root == "./" {
        PathBuf::from(relative)
    } else {
        Path::new(root).join(relative)
    }
}

/// 拆分并消解 `.` / `..` 段
fn resolve_segments(path: &str, absolute: bool) -> Vec<&str> {
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split(SEP) {
        match segment {
            "" | "." => {}
            ".." => match segments.last() {
                Some(&last) if last != ".." => {
                    segments.pop();
                }
                _ if absolute => {}
                _ => segments.push(".."),
            },
            other => segments.push(other),
        }
    }
    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_root_directories_only() {
        assert_eq!(common_root::<&str>(&[]), "");
        assert_eq!(common_root(&["apps/test.yaml"]), "apps/");
        assert_eq!(common_root(&["apps/nested/test.yaml"]), "apps/nested/");
        assert_eq!(common_root(&["test.yaml"]), ".");
        assert_eq!(
            common_root(&["", "apps/test.yaml", "apps/nested/test.yaml", "test.yaml"]),
            "."
        );
    }

    #[test]
    fn test_common_root_shared_prefix() {
        let paths = ["src/a/x.ts", "src/a/y.ts", "src/b/z.ts"];
        assert_eq!(common_root(&paths), "src/");

        let paths = ["src/a/x.ts", "src/a/deeper/y.ts"];
        assert_eq!(common_root(&paths), "src/a/");
    }

    #[test]
    fn test_common_root_permutation_invariant() {
        let paths = ["a/b/c.txt", "a/b", "a/b/d/e.txt"];
        let expected = common_root(&paths);
        assert_eq!(expected, "a/");

        let permutations = [
            ["a/b", "a/b/c.txt", "a/b/d/e.txt"],
            ["a/b/d/e.txt", "a/b", "a/b/c.txt"],
            ["a/b/c.txt", "a/b/d/e.txt", "a/b"],
        ];
        for p in permutations {
            assert_eq!(common_root(&p), expected);
        }
    }

    #[test]
    fn test_common_root_absolute() {
        let paths = ["/home/user/project/a.md", "/home/user/project/docs/b.md"];
        assert_eq!(common_root(&paths), "/home/user/project/");

        let paths = ["/a.md", "/b.md"];
        assert_eq!(common_root(&paths), "/");
    }

    #[test]
    fn test_common_root_never_a_file() {
        // 相同文件重复出现时仍返回其目录
        let paths = ["docs/readme.md", "docs/readme.md"];
        assert_eq!(common_root(&paths), "docs/");
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize(""), ".");
        assert_eq!(normalize("a//b/./c/"), "a/b/c/");
        assert_eq!(normalize("a/b/../c"), "a/c");
        assert_eq!(normalize("../a"), "../a");
        assert_eq!(normalize("/../a"), "/a");
        assert_eq!(normalize("./"), "./");
    }

    #[test]
    fn test_relative_to() {
        assert_eq!(relative_to("apps/", "apps/nested/test.yaml"), "nested/test.yaml");
        assert_eq!(relative_to(".", "test.yaml"), "test.yaml");
        assert_eq!(relative_to("", "./x/test.yaml"), "x/test.yaml");
        assert_eq!(relative_to("/srv/site/", "/srv/site/index.html"), "index.html");
        assert_eq!(relative_to("other/", "apps/a.md"), "../apps/a.md");
        assert_eq!(relative_to("a/", "a/../b/x.ts"), "../b/x.ts");
        assert_eq!(relative_to(".", "/etc/x.ts"), "/etc/x.ts");
        assert_eq!(relative_to("src/", "src/"), ".");
    }

    /// `join(root, relative_to(root, p))` 必须指向 `p` 本身
    fn round_trip(paths: &[&str]) {
        let root = common_root(paths);
        for path in paths {
            let rel = relative_to(&root, path);
            let joined = join(&root, &rel).to_string_lossy().into_owned();
            assert_eq!(
                normalize(&joined),
                normalize(path),
                "root={:?} rel={:?}",
                root,
                rel
            );
        }
    }

    #[test]
    fn test_join_relative_round_trip() {
        let cases: [[&str; 2]; 5] = [
            ["/etc/x.ts", "b/y.ts"],
            ["a/../b/x.ts", "a/y.ts"],
            ["./src/a.ts", "src/b/c.ts"],
            ["src/./a/x.ts", "src/a/../b/y.ts"],
            ["/srv/site/a.html", "/srv/other/b.html"],
        ];
        for [first, second] in cases {
            round_trip(&[first, second]);
            round_trip(&[second, first]);
        }
        round_trip(&["/abs/a.md", "rel/b.md", "./rel/c/d.md", "x/../rel/e.md"]);
        round_trip(&["x/../rel/e.md", "./rel/c/d.md", "rel/b.md", "/abs/a.md"]);
    }

    #[test]
    fn test_join() {
        assert_eq!(join(".", "a.ts"), PathBuf::from("a.ts"));
        assert_eq!(join("", "a.ts"), PathBuf::from("a.ts"));
        assert_eq!(join("src/", "lib/a.ts"), PathBuf::from("src/lib/a.ts"));
    }
}
