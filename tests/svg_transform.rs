// tests/svg_transform.rs

use assetflow::transform::svg::minify::short_id;
use assetflow::transform::svg::{
    Document, MinifyOptions, SvgError, build_sprite, minify, minify_str,
};

const ICON: &str = r##"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" version="1.1" viewBox="0 0 24 24">
  <!-- exported -->
  <title>Star</title>
  <defs><linearGradient id="grad"><stop offset="0"/></linearGradient></defs>
  <path id="unused" fill="url(#grad)" d="M0 0"/>
</svg>
"##;

#[test]
fn minify_drops_cruft_and_shortens_ids() {
    let out = minify_str(ICON, &MinifyOptions::default()).unwrap();
    assert_eq!(
        out,
        r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24"><defs><linearGradient id="a"><stop offset="0"/></linearGradient></defs><path fill="url(#a)" d="M0 0"/></svg>"##
    );
}

#[test]
fn id_prefix_scopes_ids_to_the_file() {
    let opts = MinifyOptions {
        id_prefix: Some("star-".into()),
    };
    let out = minify_str(ICON, &opts).unwrap();
    assert!(out.contains(r#"id="star-a""#), "{out}");
    assert!(out.contains("url(#star-a)"), "{out}");
}

#[test]
fn xlink_namespace_kept_only_when_used() {
    let used = r##"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink"><defs><path id="shape" d="M0 0"/></defs><use xlink:href="#shape"/></svg>"##;
    let out = minify_str(used, &MinifyOptions::default()).unwrap();
    assert_eq!(
        out,
        r##"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink"><defs><path id="a" d="M0 0"/></defs><use xlink:href="#a"/></svg>"##
    );

    let unused = r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink"><g></g><rect width="1"/></svg>"#;
    let out = minify_str(unused, &MinifyOptions::default()).unwrap();
    assert_eq!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg"><rect width="1"/></svg>"#
    );
}

#[test]
fn style_references_are_renamed() {
    let svg = r##"<svg><style>.x{fill:url(#paint)}</style><linearGradient id="paint"/></svg>"##;
    let out = minify_str(svg, &MinifyOptions::default()).unwrap();
    assert_eq!(
        out,
        r##"<svg><style>.x{fill:url(#a)}</style><linearGradient id="a"/></svg>"##
    );
}

#[test]
fn parse_errors() {
    assert_eq!(
        Document::parse("<svg><g></svg>"),
        Err(SvgError::MismatchedTag {
            line: 1,
            expected: "g".into(),
            found: "svg".into()
        })
    );
    assert_eq!(
        Document::parse("<svg>"),
        Err(SvgError::Unclosed { name: "svg".into() })
    );
    assert_eq!(Document::parse("just text"), Err(SvgError::NoRoot));
    assert!(matches!(
        Document::parse("<svg width=1/>"),
        Err(SvgError::Syntax { line: 1, .. })
    ));
}

#[test]
fn sprite_hoists_defs_and_wraps_symbols() {
    let mut first = Document::parse(
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 10 10"><path d="M0 0"/></svg>"#,
    )
    .unwrap();
    minify(&mut first, &MinifyOptions::default());
    let second = Document::parse(
        r##"<svg viewBox="0 0 20 20"><defs><linearGradient id="b-a"/></defs><rect fill="url(#b-a)"/></svg>"##,
    )
    .unwrap();

    let sprite = build_sprite(vec![("icon-a".into(), first), ("icon-b".into(), second)]).unwrap();
    assert_eq!(
        sprite,
        r##"<svg xmlns="http://www.w3.org/2000/svg"><defs><linearGradient id="b-a"/></defs><symbol id="icon-a" viewBox="0 0 10 10"><path d="M0 0"/></symbol><symbol id="icon-b" viewBox="0 0 20 20"><rect fill="url(#b-a)"/></symbol></svg>"##
    );
}

#[test]
fn sprite_rejects_non_svg_roots() {
    let doc = Document::parse("<html></html>").unwrap();
    assert_eq!(
        build_sprite(vec![("x".into(), doc)]),
        Err(SvgError::NotSvg {
            found: "html".into()
        })
    );
}

#[test]
fn short_ids_count_like_spreadsheet_columns() {
    assert_eq!(short_id(0), "a");
    assert_eq!(short_id(25), "z");
    assert_eq!(short_id(26), "aa");
    assert_eq!(short_id(27), "ab");
    assert_eq!(short_id(26 + 26 * 26), "aaa");
}
