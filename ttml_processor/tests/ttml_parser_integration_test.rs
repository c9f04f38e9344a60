use captions_core::{
    ContentNode, ConvertError, DEFAULT_LANGUAGE, StyleOptions, TtmlParsingOptions,
};
use ttml_processor::{active_cues, generate_stylesheet, parse, parse_ttml, parse_ttml_file};

const BROADCAST_TTML: &str = include_str!("test_data/broadcast.ttml");

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn test_two_overlapping_cues() {
    let content = r#"<tt xmlns="http://www.w3.org/ns/ttml"><body><div>
        <p begin="00:00:01.000" end="00:00:03.000">A</p>
        <p begin="00:00:02.000" end="00:00:04.000">B</p>
    </div></body></tt>"#;
    let captions = parse(content, 540.0).unwrap();
    let timeline = captions.timeline(DEFAULT_LANGUAGE).unwrap();

    let texts = |t: f64| -> Vec<String> { active_cues(timeline, t).iter().map(|c| c.text()).collect() };
    assert_eq!(texts(0.5), Vec::<String>::new());
    assert_eq!(texts(1.5), vec!["A"]);
    assert_eq!(texts(2.5), vec!["B", "A"]);
    assert_eq!(texts(3.5), vec!["B"]);
    assert_eq!(texts(4.0), Vec::<String>::new());
}

#[test]
fn test_broadcast_languages_and_timing() {
    let captions = parse_ttml(BROADCAST_TTML, &TtmlParsingOptions::default()).unwrap();

    assert_eq!(captions.document_language.as_deref(), Some("en"));
    assert_eq!(captions.languages, vec!["en", "fr"]);
    assert_eq!(captions.preferred_language(), Some("en"));

    let english = captions.timeline("en").unwrap();
    assert_eq!(english.len(), 4);
    let ids: Vec<_> = english.iter().map(|c| c.id.as_deref().unwrap()).collect();
    assert_eq!(ids, vec!["c1", "c2", "c3", "c4"]);

    let c3 = english.get(2).unwrap();
    assert_close(c3.begin, 5.5);
    assert_close(c3.end, 7.5);

    assert_eq!(captions.timeline("fr").unwrap().len(), 2);

    assert_eq!(captions.warnings.len(), 1);
    assert!(captions.warnings[0].contains("no end time"));
}

#[test]
fn test_broadcast_active_cues() {
    let captions = parse_ttml(BROADCAST_TTML, &TtmlParsingOptions::default()).unwrap();
    let ids = |t: f64| -> Vec<String> {
        captions
            .active_cues("en", t)
            .iter()
            .filter_map(|c| c.id.clone())
            .collect()
    };

    assert_eq!(ids(3.5), vec!["c2"]);
    assert_eq!(ids(5.6), vec!["c3", "c2"]);
    assert!(ids(7.5).is_empty());
    assert_eq!(ids(9.0), vec!["c4"]);
    assert!(captions.active_cues("de", 2.0).is_empty());
}

#[test]
fn test_broadcast_content() {
    let captions = parse_ttml(BROADCAST_TTML, &TtmlParsingOptions::default()).unwrap();
    let english = captions.timeline("en").unwrap();

    assert_eq!(english.get(0).unwrap().text(), "The tide turns at midnight.");
    assert_eq!(
        english.get(1).unwrap().text(),
        "Then we leave before it does.\nPack light."
    );
    assert_eq!(english.get(3).unwrap().text(), "Fish & chips, \u{2014} on the house.");

    let c2 = english.get(1).unwrap();
    let span_style = c2
        .content
        .nodes
        .iter()
        .find_map(|node| match node {
            ContentNode::Span { style, .. } => Some(style),
            _ => None,
        })
        .unwrap();
    assert_eq!(span_style.get("font-style"), Some("italic"));
    assert_eq!(span_style.get("font-weight"), Some("bold"));
    // inherited from the paragraph's class
    assert_eq!(span_style.get("color"), Some("rgba(255,255,0,1)"));
}

#[test]
fn test_broadcast_cascade() {
    let captions = parse_ttml(BROADCAST_TTML, &TtmlParsingOptions::default()).unwrap();
    let english = captions.timeline("en").unwrap();

    let c1 = english.get(0).unwrap();
    assert_eq!(c1.region.as_deref(), Some("bottom"));
    let text_style = &c1.content.style;
    assert_eq!(text_style.get("color"), Some("rgba(255,255,255,1)"));
    assert_eq!(text_style.get("font-family"), Some("sans-serif"));
    assert_eq!(text_style.get("font-size"), Some("36px"));
    assert_eq!(text_style.get("text-align"), Some("center"));
    // handed down by the region
    assert_eq!(
        text_style.get("text-shadow"),
        Some("0px 0px 2px rgba(0,0,0,1),0px 0px 1px rgba(0,0,0,1)")
    );
    assert!(c1.wrapper_style.get("color").is_none());

    let c2 = english.get(1).unwrap();
    assert_eq!(c2.content.style.get("color"), Some("rgba(255,255,0,1)"));

    // body styling is nearer than the region, so the region color does not win
    let c3 = english.get(2).unwrap();
    assert_eq!(c3.region.as_deref(), Some("top"));
    assert_eq!(c3.content.style.get("color"), Some("rgba(255,255,255,1)"));

    let c4 = english.get(3).unwrap();
    assert_eq!(c4.content.style.get("text-decoration"), Some("underline"));
}

#[test]
fn test_broadcast_regions_and_classes() {
    let captions = parse_ttml(BROADCAST_TTML, &TtmlParsingOptions::default()).unwrap();

    let classes: Vec<_> = captions.style_classes.keys().map(String::as_str).collect();
    assert_eq!(
        classes,
        vec!["base", "emphasis", "shaded", "shaded-region", "speaker2"]
    );
    let region_only = &captions.style_classes["shaded-region"];
    assert_eq!(region_only.get("opacity"), Some("0.8"));
    assert_eq!(region_only.get("vertical-align"), Some("bottom"));

    let bottom = &captions.regions["bottom"];
    assert_eq!(bottom.get("top"), Some("80%"));
    assert_eq!(bottom.get("left"), Some("10%"));
    assert_eq!(bottom.get("width"), Some("80%"));
    assert_eq!(bottom.get("height"), Some("15%"));
    assert_eq!(bottom.get("padding"), Some("18px"));
    assert_eq!(bottom.get("opacity"), Some("0.8"));
    assert_eq!(bottom.get("background-color"), Some("rgba(0,0,0,.5)"));

    let top = &captions.regions["top"];
    assert_eq!(top.get("vertical-align"), Some("top"));
    assert_eq!(top.get("top"), Some("5%"));
}

#[test]
fn test_surface_height_scales_cells() {
    let captions = parse(BROADCAST_TTML, 300.0).unwrap();
    let c1 = captions.timeline("en").unwrap().get(0).unwrap();
    assert_eq!(c1.content.style.get("font-size"), Some("20px"));
    assert_eq!(captions.regions["bottom"].get("padding"), Some("10px"));
}

#[test]
fn test_style_options_override_document() {
    let options = TtmlParsingOptions {
        style: StyleOptions::from_json_str(
            r##"{"set": true, "text-color": "#FF0000", "text-align": "left", "font-size": "24px"}"##,
        )
        .unwrap(),
        ..TtmlParsingOptions::default()
    };
    let captions = parse_ttml(BROADCAST_TTML, &options).unwrap();
    let c2 = captions.timeline("en").unwrap().get(1).unwrap();
    assert_eq!(c2.content.style.get("color"), Some("rgba(255,0,0,1)"));
    assert_eq!(c2.content.style.get("text-align"), Some("left"));
    assert_eq!(c2.content.style.get("font-size"), Some("24px"));
}

#[test]
fn test_untimed_document_yields_empty_set() {
    let content = r#"<tt xmlns="http://www.w3.org/ns/ttml"><body><div>
        <p>never shown</p>
    </div></body></tt>"#;
    let captions = parse(content, 540.0).unwrap();
    assert!(captions.is_empty());
    assert!(captions.languages.is_empty());
    assert_eq!(captions.warnings.len(), 1);
}

#[test]
fn test_unknown_references_are_ignored() {
    let content = r#"<tt xmlns="http://www.w3.org/ns/ttml" xmlns:tts="http://www.w3.org/ns/ttml#styling">
      <body><div>
        <p begin="0s" end="1s" region="nowhere" style="missing" tts:fontWeight="extrabold">x</p>
      </div></body></tt>"#;
    let captions = parse(content, 540.0).unwrap();
    let cue = captions.timeline(DEFAULT_LANGUAGE).unwrap().get(0).unwrap();
    assert_eq!(cue.region, None);
    assert_eq!(cue.resolved_style.get("font-weight"), Some("normal"));
    assert_eq!(captions.warnings.len(), 1);
}

#[test]
fn test_legacy_dfxp_namespace() {
    let content = r#"<tt xmlns="http://www.w3.org/2006/10/ttaf1"
                        xmlns:s="http://www.w3.org/2006/10/ttaf1#styling">
      <body><div>
        <p begin="0s" end="1s" s:color="red">legacy</p>
      </div></body></tt>"#;
    let captions = parse(content, 540.0).unwrap();
    let cue = captions.timeline(DEFAULT_LANGUAGE).unwrap().get(0).unwrap();
    assert_eq!(cue.content.style.get("color"), Some("rgba(255,0,0,1)"));
    assert!(captions.warnings.is_empty());
}

#[test]
fn test_malformed_documents_fail() {
    let options = TtmlParsingOptions::default();
    assert!(matches!(
        parse_ttml(r#"<tt><body><p begin="0s" end="1s">x</span></body></tt>"#, &options),
        Err(ConvertError::Xml(_))
    ));
    assert!(matches!(
        parse_ttml("<tt><body><div>", &options),
        Err(ConvertError::Structure(_) | ConvertError::Xml(_))
    ));
    assert!(matches!(
        parse_ttml("just text", &options),
        Err(ConvertError::Structure(_))
    ));
}

#[test]
fn test_generated_stylesheet_for_document() {
    let captions = parse_ttml(BROADCAST_TTML, &TtmlParsingOptions::default()).unwrap();
    let css = generate_stylesheet(&captions, &StyleOptions::default());

    assert!(css.contains(".caption{"));
    assert!(css.contains(".bc-default-region-style{"));
    assert!(css.contains(".shaded-region{\n  opacity:0.8;\n  vertical-align:bottom;\n}"));
    assert!(css.contains(".bottom{"));
    assert!(css.contains(".top{"));
}

#[test]
fn test_language_returns_to_parent_after_div() {
    let content = r#"<tt xmlns="http://www.w3.org/ns/ttml" xml:lang="en"><body>
      <div xml:lang="fr">
        <p begin="0s" end="1s">bonjour</p>
      </div>
      <div>
        <p begin="1s" end="2s">back</p>
      </div>
    </body></tt>"#;
    let captions = parse(content, 540.0).unwrap();
    assert_eq!(captions.languages, vec!["fr", "en"]);
    assert_eq!(captions.timeline("fr").unwrap().get(0).unwrap().text(), "bonjour");
    assert_eq!(captions.timeline("en").unwrap().get(0).unwrap().text(), "back");
}

#[test]
fn test_default_space_inside_preserved_ancestor() {
    let content = r#"<tt xmlns="http://www.w3.org/ns/ttml"><body><div xml:space="preserve">
      <p begin="0s" end="1s">  kept  <span xml:space="default">  a   b  </span></p>
      <p begin="1s" end="2s" xml:space="default">  x   y  </p>
    </div></body></tt>"#;
    let captions = parse(content, 540.0).unwrap();
    let cues = captions.timeline(DEFAULT_LANGUAGE).unwrap();
    assert_eq!(cues.get(0).unwrap().text(), "  kept  a b ");
    assert_eq!(cues.get(1).unwrap().text(), "x y");
}

#[test]
fn test_whitespace_collapses_across_element_boundaries() {
    let content = r#"<tt xmlns="http://www.w3.org/ns/ttml"><body><div>
      <p begin="0s" end="1s">Hello <span> world</span></p>
      <p begin="1s" end="2s">a<span>b<br/></span>
         c</p>
    </div></body></tt>"#;
    let captions = parse(content, 540.0).unwrap();
    let cues = captions.timeline(DEFAULT_LANGUAGE).unwrap();
    assert_eq!(cues.get(0).unwrap().text(), "Hello world");
    assert_eq!(cues.get(1).unwrap().text(), "ab\nc");
}

#[test]
fn test_illegal_character_reference_is_dropped() {
    let content = r#"<tt xmlns="http://www.w3.org/ns/ttml"><body><div>
      <p begin="0s" end="1s">&#233; &#0; x</p>
    </div></body></tt>"#;
    let captions = parse(content, 540.0).unwrap();
    let cue = captions.timeline(DEFAULT_LANGUAGE).unwrap().get(0).unwrap();
    assert_eq!(cue.text(), "\u{e9} x");
    assert_eq!(captions.warnings.len(), 1);
    assert!(captions.warnings[0].contains("&#0;"));
}

#[test]
fn test_parse_ttml_file() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/test_data/broadcast.ttml");
    let captions = parse_ttml_file(path, &TtmlParsingOptions::default()).unwrap();
    assert_eq!(captions.timeline("en").unwrap().len(), 4);

    assert!(matches!(
        parse_ttml_file("does/not/exist.ttml", &TtmlParsingOptions::default()),
        Err(ConvertError::Io(_))
    ));
}
