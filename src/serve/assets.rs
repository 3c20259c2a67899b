//! Contributions viewer bundled into the binary.
//!
//! Served only when the directory on disk does not provide the path itself.

#[derive(Debug, PartialEq, Eq)]
pub struct Asset {
    pub path: &'static str,
    pub content_type: &'static str,
    pub body: &'static str,
}

pub static VIEWER_INDEX: Asset = Asset {
    path: "/",
    content_type: "text/html; charset=utf-8",
    body: include_str!("../../assets/index.html"),
};

pub static VIEWER_SCRIPT: Asset = Asset {
    path: "/viewer.js",
    content_type: "text/javascript; charset=utf-8",
    body: include_str!("../../assets/viewer.js"),
};

static ASSETS: [&Asset; 2] = [&VIEWER_INDEX, &VIEWER_SCRIPT];

pub fn lookup(url_path: &str) -> Option<&'static Asset> {
    ASSETS.iter().copied().find(|a| a.path == url_path)
}
