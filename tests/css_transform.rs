// tests/css_transform.rs

use std::collections::HashSet;
use std::path::Path;

use assetflow::config::{DarkMode, Theme};
use assetflow::fs::mock::MockFileSystem;
use assetflow::transform::css::utilities::{self, Catalog, escape_class};
use assetflow::transform::css::{self, CssError, Node, Stylesheet};

fn used(classes: &[&str]) -> HashSet<String> {
    classes.iter().map(|c| c.to_string()).collect()
}

fn selectors(sheet: &Stylesheet) -> Vec<String> {
    sheet
        .nodes
        .iter()
        .filter_map(|n| match n {
            Node::Rule(r) => Some(r.selector.clone()),
            _ => None,
        })
        .collect()
}

#[test]
fn parse_reports_line_of_unclosed_block() {
    let err = css::parse(".a { color: red; }\n.b {\n  color: blue;\n").unwrap_err();
    assert!(
        matches!(err, CssError::UnclosedBlock { line: 2 }),
        "{err:?}"
    );
}

#[test]
fn parse_rejects_stray_brace_and_open_comment() {
    assert!(matches!(
        css::parse(".a{}\n}\n"),
        Err(CssError::UnexpectedBrace { line: 2 })
    ));
    assert!(matches!(
        css::parse(".a{}\n/* never closed"),
        Err(CssError::UnterminatedComment { line: 2 })
    ));
    assert!(matches!(
        css::parse(".a { color red; }"),
        Err(CssError::InvalidDeclaration { line: 1, .. })
    ));
}

#[test]
fn parse_builds_nested_tree() {
    let sheet =
        css::parse("@media (min-width: 640px) {\n  .a, .b { margin: 0 !important; }\n}\n").unwrap();
    let Node::AtRule(media) = &sheet.nodes[0] else {
        panic!("expected at-rule, got {:?}", sheet.nodes[0]);
    };
    assert_eq!(media.name, "media");
    assert_eq!(media.params, "(min-width: 640px)");
    let children = media.nodes.as_ref().unwrap();
    let Node::Rule(rule) = &children[0] else {
        panic!("expected rule");
    };
    assert_eq!(rule.selectors(), vec![".a", ".b"]);
    let Node::Declaration(decl) = &rule.nodes[0] else {
        panic!("expected declaration");
    };
    assert_eq!(decl.property, "margin");
    assert_eq!(decl.value, "0");
    assert!(decl.important);
}

#[test]
fn minify_collapses_and_shortens() {
    let sheet = css::parse(
        "/* note */\n.a {\n  color: #ffffff;\n  margin: 0px 0.5em;\n}\n/*! keep */\n@media (min-width: 640px) {\n  .b { padding: 10px; }\n}\n",
    )
    .unwrap();
    assert_eq!(
        css::minify(&sheet),
        ".a{color:#fff;margin:0 .5em}/*! keep */@media (min-width:640px){.b{padding:10px}}"
    );
}

#[test]
fn minify_keeps_strings_urls_and_numbers() {
    let sheet = css::parse(
        "@font-face {\n  font-family: \"Open Sans\";\n  src: url(\"../fonts/a b.woff2\") format(\"woff2\");\n}\n.z { z-index: 10; content: \"  two  spaces \"; }\n",
    )
    .unwrap();
    assert_eq!(
        css::minify(&sheet),
        "@font-face{font-family:\"Open Sans\";src:url(\"../fonts/a b.woff2\") format(\"woff2\")}.z{z-index:10;content:\"  two  spaces \"}"
    );
}

#[test]
fn minify_keeps_zero_units_inside_math_functions() {
    let sheet = css::parse(
        ".a { width: calc(100% - 0px); margin: 0px; }\n.b { height: clamp(0rem, calc(10vh + 0px), 0px); top: min(0px, 1em) ; left: translate(0px); }\n",
    )
    .unwrap();
    assert_eq!(
        css::minify(&sheet),
        ".a{width:calc(100% - 0px);margin:0}.b{height:clamp(0rem,calc(10vh + 0px),0px);top:min(0px,1em);left:translate(0)}"
    );
}

#[test]
fn pretty_output_is_readable() {
    let sheet = css::parse(".a{color:red}.b,.c{margin:0}").unwrap();
    assert_eq!(
        sheet.to_pretty(),
        ".a {\n  color: red;\n}\n\n.b,\n.c {\n  margin: 0;\n}\n"
    );
}

#[test]
fn purge_drops_unused_selectors() {
    let sheet = css::parse(
        "html { margin: 0; }\n.used { color: red; }\n.unused { color: blue; }\n.used .unused { color: green; }\n.unused, .used:hover { color: black; }\n@media print { .unused { display: none; } }\n",
    )
    .unwrap();
    let purged = css::purge(sheet, &used(&["used"]));
    assert_eq!(selectors(&purged), vec!["html", ".used", ".used:hover"]);
    // The media block lost every rule and went with them.
    assert!(!purged.nodes.iter().any(|n| matches!(n, Node::AtRule(_))));
}

#[test]
fn purge_keeps_font_faces_and_keyframes() {
    let sheet = css::parse(
        "@font-face { font-family: X; }\n@keyframes spin { from { transform: rotate(0deg); } }\n",
    )
    .unwrap();
    let purged = css::purge(sheet.clone(), &HashSet::new());
    assert_eq!(purged, sheet);
}

#[test]
fn purge_understands_escaped_class_names() {
    let sheet =
        css::parse(".md\\:w-1\\/2 { width: 50%; }\n.\\32 xl\\:p-4 { padding: 1rem; }\n").unwrap();
    let purged = css::purge(sheet, &used(&["md:w-1/2"]));
    assert_eq!(selectors(&purged), vec![".md\\:w-1\\/2"]);
}

#[test]
fn candidates_come_from_markup_and_scripts() {
    let found = css::extract_candidates(
        "<div class=\"md:w-1/2 text-blue-500\">x</div>\nel.classList.add('hidden');",
    );
    for class in ["md:w-1/2", "text-blue-500", "hidden"] {
        assert!(found.contains(class), "missing {class}");
    }
}

#[test]
fn prefix_inserts_vendor_declarations_first() {
    let mut sheet = css::parse(".a { user-select: none; position: sticky; }").unwrap();
    css::prefix(&mut sheet);
    assert_eq!(
        css::minify(&sheet),
        ".a{-webkit-user-select:none;-moz-user-select:none;-ms-user-select:none;user-select:none;position:-webkit-sticky;position:sticky}"
    );
}

#[test]
fn prefix_does_not_duplicate_existing_declarations() {
    let mut sheet = css::parse(".a { -webkit-user-select: none; user-select: none; }").unwrap();
    css::prefix(&mut sheet);
    assert_eq!(
        css::minify(&sheet),
        ".a{-webkit-user-select:none;-moz-user-select:none;-ms-user-select:none;user-select:none}"
    );
}

#[test]
fn apply_expands_utilities_in_place() {
    let sheet = css::parse(".btn { @apply text-white bg-blue-500; cursor: pointer; }").unwrap();
    let expanded = utilities::expand(sheet, &Theme::default()).unwrap();
    assert_eq!(
        css::minify(&expanded),
        ".btn{color:#fff;background-color:#3b82f6;cursor:pointer}"
    );
}

#[test]
fn apply_important_marks_every_declaration() {
    let sheet = css::parse(".x { @apply p-4 !important; }").unwrap();
    let expanded = utilities::expand(sheet, &Theme::default()).unwrap();
    assert_eq!(css::minify(&expanded), ".x{padding:1rem!important}");
}

#[test]
fn apply_unknown_utility_names_class_and_selector() {
    let sheet = css::parse(".card { @apply shadow-huge; }").unwrap();
    let err = utilities::expand(sheet, &Theme::default()).unwrap_err();
    match err {
        CssError::UnknownUtility { class, selector } => {
            assert_eq!(class, "shadow-huge");
            assert_eq!(selector, ".card");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn apply_state_and_screen_variants_become_sibling_rules() {
    let sheet = css::parse(
        ".btn, .link { @apply bg-blue-500 p-2 hover:bg-blue-700 md:p-4 focus:text-white; }\n.after { color: red; }\n",
    )
    .unwrap();
    let expanded = utilities::expand(sheet, &Theme::default()).unwrap();
    assert_eq!(
        css::minify(&expanded),
        ".btn,.link{background-color:#3b82f6;padding:.5rem}\
.btn:hover,.link:hover{background-color:#1d4ed8}\
@media (min-width:768px){.btn,.link{padding:1rem}}\
.btn:focus,.link:focus{color:#fff}\
.after{color:red}"
    );
}

#[test]
fn apply_dark_variant_follows_dark_mode() {
    let source = ".card { @apply bg-white dark:bg-black; }";

    let class = Theme {
        dark_mode: DarkMode::Class,
        ..Theme::default()
    };
    let expanded = utilities::expand(css::parse(source).unwrap(), &class).unwrap();
    assert_eq!(
        css::minify(&expanded),
        ".card{background-color:#fff}.dark .card{background-color:#000}"
    );

    let media = Theme {
        dark_mode: DarkMode::Media,
        ..Theme::default()
    };
    let expanded = utilities::expand(css::parse(source).unwrap(), &media).unwrap();
    assert_eq!(
        css::minify(&expanded),
        ".card{background-color:#fff}@media (prefers-color-scheme:dark){.card{background-color:#000}}"
    );

    let err = utilities::expand(css::parse(source).unwrap(), &Theme::default()).unwrap_err();
    assert!(matches!(err, CssError::UnknownUtility { ref class, .. } if class == "dark:bg-black"));
}

#[test]
fn apply_rejects_variants_the_catalog_does_not_generate() {
    for class in [
        "hover:p-4",
        "wobble:bg-blue-500",
        "hover:md:bg-blue-500",
        "md:nope",
    ] {
        let sheet = css::parse(&format!(".x {{ @apply {class}; }}")).unwrap();
        let err = utilities::expand(sheet, &Theme::default()).unwrap_err();
        match err {
            CssError::UnknownUtility {
                class: reported,
                selector,
            } => {
                assert_eq!(reported, class);
                assert_eq!(selector, ".x");
            }
            other => panic!("unexpected error for {class}: {other:?}"),
        }
    }
}

#[test]
fn catalog_respects_theme_switches() {
    let default = Catalog::new(&Theme::default());
    assert!(default.get("container").is_none());
    assert!(default.get("text-blue-500").is_some());
    assert!(default.get("mx-auto").is_some());
    assert!(!default.components().is_empty());

    let mut theme = Theme::default();
    theme.core_plugins.insert("textColor".into(), false);
    theme.core_plugins.insert("container".into(), false);
    let trimmed = Catalog::new(&theme);
    assert!(trimmed.get("text-blue-500").is_none());
    assert!(trimmed.get("bg-blue-500").is_some());
    assert!(trimmed.components().is_empty());
    assert!(trimmed.len() < default.len());
}

#[test]
fn dark_mode_class_variants() {
    let theme = Theme {
        dark_mode: DarkMode::Class,
        ..Theme::default()
    };
    let sheet = css::parse("@tailwind utilities;").unwrap();
    let expanded = utilities::expand(sheet, &theme).unwrap();
    assert!(selectors(&expanded).contains(&".dark .dark\\:text-white".to_string()));

    let media = Theme {
        dark_mode: DarkMode::Media,
        ..Theme::default()
    };
    let expanded = utilities::expand(css::parse("@tailwind utilities;").unwrap(), &media).unwrap();
    let min = css::minify(&expanded);
    assert!(min.contains("@media (prefers-color-scheme:dark){"));
    assert!(min.contains(".dark\\:text-white{color:#fff}"));
}

#[test]
fn escaped_class_names() {
    assert_eq!(escape_class("w-1/2"), "w-1\\/2");
    assert_eq!(escape_class("md:p-4"), "md\\:p-4");
    assert_eq!(escape_class("2xl:p-4"), "\\32 xl\\:p-4");
}

#[test]
fn compile_inlines_imports_once() {
    let fs = MockFileSystem::new();
    fs.add_file(
        "/site/src/css/app.css",
        "@import \"./parts/a.css\";\n@import \"parts/a\";\n@import url(print.css) print;\n@import \"https://fonts.example/x.css\";\n.z { color: red; }\n",
    );
    fs.add_file("/site/src/css/parts/a.css", ".a { color: blue; }\n");
    fs.add_file("/site/src/css/print.css", ".p { display: none; }\n");

    let sheet = css::compile(&fs, Path::new("/site/src/css/app.css"), &Theme::default()).unwrap();
    assert_eq!(
        css::minify(&sheet),
        ".a{color:blue}@media print{.p{display:none}}@import \"https://fonts.example/x.css\";.z{color:red}"
    );
}

#[test]
fn compile_reports_missing_import_and_file_errors() {
    let fs = MockFileSystem::new();
    fs.add_file("/site/src/css/app.css", "@import \"./missing.css\";\n");
    let err = css::compile(&fs, Path::new("/site/src/css/app.css"), &Theme::default()).unwrap_err();
    assert!(matches!(err, CssError::ImportNotFound { .. }), "{err:?}");

    fs.add_file("/site/src/css/app.css", "@import \"./broken.css\";\n");
    fs.add_file("/site/src/css/broken.css", ".x {\n");
    let err = css::compile(&fs, Path::new("/site/src/css/app.css"), &Theme::default()).unwrap_err();
    let message = err.to_string();
    assert!(message.contains("broken.css"), "{message}");
    assert!(message.contains("unclosed block"), "{message}");
}
