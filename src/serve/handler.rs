use super::assets::{self, Asset};
use std::io;
use std::path::{Path, PathBuf};

const INDEX_FILES: [&str; 2] = ["index.html", "index.htm"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolved {
    File(PathBuf),
    Listing(PathBuf),
    Redirect(String),
    Embedded(&'static Asset),
    NotFound,
    Forbidden,
}

/// Map a request target onto a path below `root`.
///
/// With `viewer`, the bundled viewer fills in for `/` and `/viewer.js`
/// when the directory has nothing of its own at those paths.
pub fn resolve(root: &Path, url: &str, viewer: bool) -> Resolved {
    let (path_part, query) = match url.find(['?', '#']) {
        Some(i) => (&url[..i], &url[i..]),
        None => (url, ""),
    };
    let Some(decoded) = percent_decode(path_part) else {
        return Resolved::NotFound;
    };

    let mut fs_path = root.to_path_buf();
    for segment in decoded.split('/') {
        match segment {
            "" | "." => continue,
            ".." => return Resolved::Forbidden,
            s if s.contains(['\\', '\0']) => return Resolved::Forbidden,
            s => fs_path.push(s),
        }
    }

    if fs_path.is_dir() {
        if !path_part.ends_with('/') {
            let query = if query.starts_with('?') { query } else { "" };
            return Resolved::Redirect(format!("{path_part}/{query}"));
        }
        for index in INDEX_FILES {
            let candidate = fs_path.join(index);
            if candidate.is_file() {
                return Resolved::File(candidate);
            }
        }
        if let Some(asset) = embedded(path_part, viewer) {
            return Resolved::Embedded(asset);
        }
        return Resolved::Listing(fs_path);
    }

    if fs_path.is_file() {
        return Resolved::File(fs_path);
    }
    match embedded(path_part, viewer) {
        Some(asset) => Resolved::Embedded(asset),
        None => Resolved::NotFound,
    }
}

fn embedded(path: &str, viewer: bool) -> Option<&'static Asset> {
    if viewer {
        assets::lookup(path)
    } else {
        None
    }
}

pub fn content_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "html" | "htm" => "text/html; charset=utf-8",
        "css" => "text/css; charset=utf-8",
        "js" | "mjs" => "text/javascript; charset=utf-8",
        "json" | "map" => "application/json",
        "txt" | "md" | "rs" | "py" | "toml" | "csv" => "text/plain; charset=utf-8",
        "xml" => "application/xml",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        "webp" => "image/webp",
        "wasm" => "application/wasm",
        "pdf" => "application/pdf",
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        _ => "application/octet-stream",
    }
}

pub fn render_listing(dir: &Path, url_path: &str) -> io::Result<String> {
    let mut entries: Vec<(String, bool)> = std::fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .map(|e| {
            let is_dir = e.file_type().map(|t| t.is_dir()).unwrap_or(false);
            (e.file_name().to_string_lossy().into_owned(), is_dir)
        })
        .collect();
    entries.sort_by_key(|(name, _)| name.to_lowercase());

    let title = format!("Directory listing for {}", html_escape(url_path));
    let mut html = String::new();
    html.push_str("<!DOCTYPE HTML>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str(&format!("<title>{title}</title>\n</head>\n<body>\n<h1>{title}</h1>\n<hr>\n<ul>\n"));
    for (name, is_dir) in entries {
        let display = if is_dir { format!("{name}/") } else { name };
        html.push_str(&format!(
            "<li><a href=\"{}\">{}</a></li>\n",
            percent_encode(&display),
            html_escape(&display)
        ));
    }
    html.push_str("</ul>\n<hr>\n</body>\n</html>\n");
    Ok(html)
}

pub fn html_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// `None` on malformed escapes or non UTF-8 results.
pub fn percent_decode(s: &str) -> Option<String> {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = bytes.get(i + 1..i + 3)?;
            let hex = std::str::from_utf8(hex).ok()?;
            out.push(u8::from_str_radix(hex, 16).ok()?);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8(out).ok()
}

pub fn percent_encode(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for b in s.bytes() {
        if b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.' | b'~' | b'/') {
            out.push(b as char);
        } else {
            out.push_str(&format!("%{b:02X}"));
        }
    }
    out
}
