use super::*;

const PAGE: &str = r#"
<html><body>
  <div class="item">
    <span class="item-name">  Stone   crusher </span>
    <img src="/images/items/stone_crusher.png">
    <ul class="item-props">
      <li>+150 To Attack Rating</li>
      <li>Cannot Be Frozen</li>
      <li>   </li>
    </ul>
  </div>
  <div class="item" data-kind="runes">
    <span class="item-name">Ber Rune</span>
  </div>
  <div class="item" data-kind="mystery">
    <span class="item-name">Odd Thing</span>
  </div>
  <div class="item"><img src="/nameless.png"></div>
</body></html>
"#;

#[test]
fn parses_items_with_defaults() {
    let items = parse_html(PAGE, &HtmlSelectors::default(), ItemKind::Unique, "uniques.html")
        .unwrap();
    assert_eq!(items.len(), 3);

    let sc = &items[0];
    assert_eq!(sc.name, "Stone crusher");
    assert_eq!(sc.kind, ItemKind::Unique);
    assert_eq!(sc.image.as_deref(), Some("/images/items/stone_crusher.png"));
    assert_eq!(
        sc.properties,
        vec![
            SourceProperty::Text("+150 To Attack Rating".into()),
            SourceProperty::Text("Cannot Be Frozen".into()),
        ]
    );
    assert_eq!(sc.source, "uniques.html");
}

#[test]
fn data_kind_overrides_default() {
    let items = parse_html(PAGE, &HtmlSelectors::default(), ItemKind::Unique, "p").unwrap();
    assert_eq!(items[1].kind, ItemKind::Rune);
    assert!(items[1].image.is_none());
    // Unknown kinds fall back to the page default.
    assert_eq!(items[2].kind, ItemKind::Unique);
}

#[test]
fn custom_selectors() {
    let page = r#"<table><tr class="row"><td><b>Shako</b></td><td><p>+2 To All Skills</p></td></tr></table>"#;
    let selectors = HtmlSelectors {
        item: "tr.row".into(),
        name: "b".into(),
        image: "img".into(),
        properties: "p".into(),
    };
    let items = parse_html(page, &selectors, ItemKind::Unique, "p").unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].name, "Shako");
    assert_eq!(items[0].properties.len(), 1);
}

#[test]
fn invalid_selector_is_an_error() {
    let selectors = HtmlSelectors {
        item: "div[".into(),
        ..Default::default()
    };
    let err = parse_html(PAGE, &selectors, ItemKind::Unique, "p").unwrap_err();
    assert!(matches!(err, SourceError::Selector(_)));
}
