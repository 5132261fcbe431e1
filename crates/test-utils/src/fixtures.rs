//! A small but complete sample site covering every task's inputs.

use std::path::Path;

use assetflow::fs::mock::MockFileSystem;

pub const INDEX_PAGE: &str = r#"@@include('../partials/head.shtml', { "title": "Home" })
<main class="container mx-auto p-4">
<h1 class="text-blue-500 font-bold">Welcome</h1>
<p class="btn-primary">Get started</p>
<svg class="w-6 h-6"><use href="assets/images/icons.svg#icon-star"></use></svg>
</main>
@@include('../partials/foot.shtml')
"#;

pub const ABOUT_PAGE: &str = r#"@@include('../partials/head.shtml', { "title": "About" })
<main class="p-4">
<h1 class="text-gray-900">About</h1>
</main>
@@include('../partials/foot.shtml')
"#;

pub const HEAD_PARTIAL: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>@@title</title>
<link rel="stylesheet" href="css/fonts.css">
<link rel="stylesheet" href="css/app.min.css">
</head>
<body>
"#;

pub const FOOT_PARTIAL: &str = r#"<script src="js/app.min.js"></script>
</body>
</html>
"#;

pub const APP_CSS: &str = r#"@import "tailwindcss/base";
@import "tailwindcss/components";
@import "tailwindcss/utilities";
@import "./components/button.css";
"#;

pub const BUTTON_CSS: &str = r#".btn-primary {
  @apply text-white bg-blue-500;
  user-select: none;
}
"#;

pub const FONTS_CSS: &str = r#"@font-face {
  font-family: "Open Sans";
  src: url("../assets/fonts/open-sans.woff2") format("woff2");
}
"#;

pub const APP_JS: &str = r#"// Toggle the mobile menu.
function toggleMenu(id) {
    var menu = document.getElementById(id);
    menu.classList.toggle('hidden');   /* tailwind class */
}
"#;

pub const VENDOR_JS: &str = "/*! vendor lib v1 */\nwindow.vendor = {};\n";

/// Two icons that both use the id `a`.
pub const STAR_SVG: &str = r##"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24">
  <title>Star</title>
  <defs><linearGradient id="a"><stop offset="0" stop-color="#fc0"/></linearGradient></defs>
  <path fill="url(#a)" d="M12 2l3 7h7l-6 4 2 7-6-4-6 4 2-7-6-4h7z"/>
</svg>
"##;

pub const HEART_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24">
  <defs><linearGradient id="a"><stop offset="0" stop-color="#f00"/></linearGradient></defs>
  <path fill="url(#a)" d="M12 21l-9-9a5 5 0 0 1 9-6 5 5 0 0 1 9 6z"/>
</svg>
"##;

/// A 1x1 PNG with a `tEXt` chunk the optimiser removes.
pub fn sample_png() -> Vec<u8> {
    let mut png = b"\x89PNG\r\n\x1a\n".to_vec();
    png.extend(chunk(b"IHDR", &[0, 0, 0, 1, 0, 0, 0, 1, 8, 6, 0, 0, 0]));
    png.extend(chunk(b"tEXt", b"Comment\0made with an editor"));
    png.extend(chunk(
        b"IDAT",
        &[0x78, 0x9c, 0x63, 0x00, 0x01, 0x00, 0x00, 0x05, 0x00, 0x01],
    ));
    png.extend(chunk(b"IEND", &[]));
    png
}

/// CRCs are not checked by the optimiser; zero is fine for fixtures.
pub fn chunk(kind: &[u8; 4], data: &[u8]) -> Vec<u8> {
    let mut out = (data.len() as u32).to_be_bytes().to_vec();
    out.extend_from_slice(kind);
    out.extend_from_slice(data);
    out.extend_from_slice(&[0, 0, 0, 0]);
    out
}

/// Every file of the sample site, relative to the project root.
pub fn sample_site_files() -> Vec<(&'static str, Vec<u8>)> {
    vec![
        ("src/pages/index.shtml", INDEX_PAGE.into()),
        ("src/pages/about.shtml", ABOUT_PAGE.into()),
        ("src/partials/head.shtml", HEAD_PARTIAL.into()),
        ("src/partials/foot.shtml", FOOT_PARTIAL.into()),
        ("src/css/app.css", APP_CSS.into()),
        ("src/css/components/button.css", BUTTON_CSS.into()),
        ("src/css/fonts.css", FONTS_CSS.into()),
        ("src/js/app.js", APP_JS.into()),
        ("src/js/vendors/vendor.js", VENDOR_JS.into()),
        (
            "src/assets/fonts/open-sans.woff2",
            b"wOF2\x00\x01fontdata".to_vec(),
        ),
        ("src/assets/icons/star.svg", STAR_SVG.into()),
        ("src/assets/icons/heart.svg", HEART_SVG.into()),
        ("src/assets/images/logo.png", sample_png()),
        ("src/assets/uploads/2024/photo.png", sample_png()),
        ("src/robots.txt", b"User-agent: *\nAllow: /\n".to_vec()),
        ("theme.toml", b"dark_mode = false\n".to_vec()),
    ]
}

/// Write the sample site under a real directory.
pub fn write_sample_site(root: &Path) {
    for (rel, content) in sample_site_files() {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, content).unwrap();
    }
}

/// Load the sample site into an in-memory filesystem rooted at `root`.
pub fn mock_sample_site(root: &Path) -> MockFileSystem {
    let fs = MockFileSystem::new();
    for (rel, content) in sample_site_files() {
        fs.add_file(root.join(rel), content);
    }
    fs
}
