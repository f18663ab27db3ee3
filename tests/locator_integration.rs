use appium_use::locator::{generate_elements, FilterConfig, Platform, Strategy};
use appium_use::source::xpath;
use appium_use::source::parse_document;

#[test]
fn distinct_resource_ids_need_no_indexing() {
    // Two "OK"-labelled buttons under different parents, each with its own
    // resource-id
    let xml = r#"<hierarchy>
      <android.widget.FrameLayout bounds="[0,0][1080,1920]">
        <android.widget.LinearLayout bounds="[0,0][1080,960]">
          <android.widget.Button resource-id="com.app:id/confirm" text="OK" clickable="true" bounds="[0,0][200,100]"/>
        </android.widget.LinearLayout>
        <android.widget.LinearLayout bounds="[0,960][1080,1920]">
          <android.widget.Button resource-id="com.app:id/accept" text="OK" clickable="true" bounds="[0,960][200,1060]"/>
        </android.widget.LinearLayout>
      </android.widget.FrameLayout>
    </hierarchy>"#;

    let elements = generate_elements(xml, Platform::Android, (1080, 1920), &FilterConfig::default());

    let confirm = elements
        .iter()
        .find(|e| e.resource_id.as_deref() == Some("com.app:id/confirm"))
        .expect("confirm button missing");
    let accept = elements
        .iter()
        .find(|e| e.resource_id.as_deref() == Some("com.app:id/accept"))
        .expect("accept button missing");

    assert_eq!(
        confirm.locators.get(&Strategy::Id).map(String::as_str),
        Some("com.app:id/confirm")
    );
    assert_eq!(
        accept.locators.get(&Strategy::Id).map(String::as_str),
        Some("com.app:id/accept")
    );
    for e in [confirm, accept] {
        for value in e.locators.values() {
            assert!(!value.contains(".instance("), "unexpected index in {}", value);
        }
    }

    // The duplicated text is not trusted as a simple locator
    assert!(confirm.locators.get(&Strategy::Text).is_none());
}

#[test]
fn duplicate_elements_get_positional_fallbacks() {
    // Three identical list rows sharing resource-id and text
    let xml = r#"<hierarchy>
      <android.widget.FrameLayout bounds="[0,0][1080,1920]">
        <android.widget.Button resource-id="com.app:id/submit" text="Submit" clickable="true" bounds="[0,0][1080,100]"/>
        <android.widget.Button resource-id="com.app:id/submit" text="Submit" clickable="true" bounds="[0,100][1080,200]"/>
        <android.widget.Button resource-id="com.app:id/submit" text="Submit" clickable="true" bounds="[0,200][1080,300]"/>
      </android.widget.FrameLayout>
    </hierarchy>"#;

    let elements = generate_elements(xml, Platform::Android, (1080, 1920), &FilterConfig::default());
    let buttons: Vec<_> = elements
        .iter()
        .filter(|e| e.tag_name == "android.widget.Button")
        .collect();
    assert_eq!(buttons.len(), 3);

    let doc = parse_document(xml).expect("document parse");
    let mut xpaths = Vec::new();
    for (i, button) in buttons.iter().enumerate() {
        // Simple id/text candidates must have been rejected as non-unique
        assert!(button.locators.get(&Strategy::Id).is_none());
        assert!(button.locators.get(&Strategy::Text).is_none());

        // UiAutomator falls back to 0-based instance indexing
        let ui = button.locators.get(&Strategy::UiAutomator).expect("uiautomator");
        assert!(ui.ends_with(&format!(".instance({})", i)), "got {}", ui);

        // Each XPath resolves to exactly its own element
        let xp = button.locators.get(&Strategy::Xpath).expect("xpath");
        let matches = xpath::evaluate(&doc, xp).expect("xpath evaluates");
        assert_eq!(matches.len(), 1, "{} matched {} nodes", xp, matches.len());
        let target = doc.node_by_path(&button.path).expect("target node");
        assert_eq!(matches[0], target);
        xpaths.push(xp.clone());
    }
    xpaths.sort();
    xpaths.dedup();
    assert_eq!(xpaths.len(), 3, "positional XPaths must be distinct");
}

#[test]
fn empty_and_malformed_sources_yield_empty_results() {
    for xml in ["", "   \n  ", "<hierarchy><unclosed>", "not xml at all"] {
        let elements =
            generate_elements(xml, Platform::Android, (1080, 1920), &FilterConfig::default());
        assert!(elements.is_empty(), "expected empty result for {:?}", xml);
    }
}

#[test]
fn invisible_ios_elements_are_filtered_by_default() {
    let xml = r#"<XCUIElementTypeApplication name="Demo">
      <XCUIElementTypeWindow x="0" y="0" width="390" height="844">
        <XCUIElementTypeButton name="hidden" label="Hidden" visible="false" x="0" y="0" width="100" height="40"/>
        <XCUIElementTypeButton name="shown" label="Shown" visible="true" x="0" y="100" width="100" height="40"/>
      </XCUIElementTypeWindow>
    </XCUIElementTypeApplication>"#;

    let elements = generate_elements(xml, Platform::Ios, (390, 844), &FilterConfig::default());
    assert!(elements
        .iter()
        .all(|e| e.accessibility_id.as_deref() != Some("hidden")));
    assert!(elements
        .iter()
        .any(|e| e.accessibility_id.as_deref() == Some("shown")));
}

#[test]
fn status_bar_gets_accessibility_id_but_no_uiautomator() {
    // Chrome outside the last /hierarchy child with a unique content-desc
    let xml = r#"<hierarchy>
      <android.widget.FrameLayout bounds="[0,0][1080,66]">
        <android.widget.ImageView content-desc="Signal strength" clickable="true" bounds="[900,0][960,66]"/>
      </android.widget.FrameLayout>
      <android.widget.FrameLayout bounds="[0,66][1080,1920]">
        <android.widget.Button resource-id="com.app:id/go" text="Go" clickable="true" bounds="[0,100][200,200]"/>
      </android.widget.FrameLayout>
    </hierarchy>"#;

    let elements = generate_elements(xml, Platform::Android, (1080, 1920), &FilterConfig::default());

    let signal = elements
        .iter()
        .find(|e| e.accessibility_id.as_deref() == Some("Signal strength"))
        .expect("status bar icon missing");
    assert!(signal.locators.contains_key(&Strategy::AccessibilityId));
    assert!(!signal.locators.contains_key(&Strategy::UiAutomator));
    assert!(!signal.locators.contains_key(&Strategy::ClassName));

    let go = elements
        .iter()
        .find(|e| e.resource_id.as_deref() == Some("com.app:id/go"))
        .expect("app button missing");
    assert!(go.locators.contains_key(&Strategy::UiAutomator));
}

#[test]
fn verified_locators_are_unique_against_the_tree() {
    let xml = r#"<hierarchy>
      <android.widget.FrameLayout bounds="[0,0][1080,1920]">
        <android.widget.EditText resource-id="com.app:id/email" text="" clickable="true" bounds="[40,300][1040,400]"/>
        <android.widget.EditText resource-id="com.app:id/password" text="" clickable="true" bounds="[40,450][1040,550]"/>
        <android.widget.Button resource-id="com.app:id/login" text="Log in" content-desc="Log in button" clickable="true" bounds="[40,600][1040,700]"/>
      </android.widget.FrameLayout>
    </hierarchy>"#;

    let elements = generate_elements(xml, Platform::Android, (1080, 1920), &FilterConfig::default());
    let doc = parse_document(xml).expect("document parse");

    for element in &elements {
        // Dedup invariant: no two locators share a value
        let mut values: Vec<&String> = element.locators.values().collect();
        let before = values.len();
        values.sort();
        values.dedup();
        assert_eq!(values.len(), before, "duplicate values for {}", element.path);

        // Uniqueness invariant for the XPath-checkable strategies
        if let Some(xp) = element.locators.get(&Strategy::Xpath) {
            let matches = xpath::evaluate(&doc, xp).expect("xpath evaluates");
            assert_eq!(matches.len(), 1, "{} is not unique", xp);
        }
    }
}

#[test]
fn viewport_invariant_holds() {
    let xml = r#"<hierarchy>
      <android.widget.FrameLayout bounds="[0,0][1080,1920]">
        <android.widget.Button resource-id="com.app:id/in" text="In" clickable="true" bounds="[0,0][200,100]"/>
        <android.widget.Button resource-id="com.app:id/part" text="Partial" clickable="true" bounds="[1000,1800][1200,2000]"/>
        <android.widget.Button resource-id="com.app:id/neg" text="Negative" clickable="true" bounds="[-10,0][190,100]"/>
        <android.widget.Button resource-id="com.app:id/zero" text="Zero" clickable="true" bounds="[0,0][0,100]"/>
      </android.widget.FrameLayout>
    </hierarchy>"#;

    let elements = generate_elements(xml, Platform::Android, (1080, 1920), &FilterConfig::default());

    for element in &elements {
        if element.in_viewport {
            let b = element.bounds.expect("in-viewport element has bounds");
            assert!(b.x >= 0 && b.y >= 0);
            assert!(b.width > 0 && b.height > 0);
            assert!(b.x + b.width <= 1080);
            assert!(b.y + b.height <= 1920);
        }
    }

    let by_id = |id: &str| {
        elements
            .iter()
            .find(|e| e.resource_id.as_deref() == Some(id))
            .unwrap_or_else(|| panic!("{} missing", id))
    };
    assert!(by_id("com.app:id/in").in_viewport);
    assert!(!by_id("com.app:id/part").in_viewport);
    assert!(!by_id("com.app:id/neg").in_viewport);
    assert!(!by_id("com.app:id/zero").in_viewport);
}

#[test]
fn generation_is_deterministic() {
    let xml = r#"<hierarchy>
      <android.widget.FrameLayout bounds="[0,0][1080,1920]">
        <android.widget.Button resource-id="com.app:id/a" text="A" clickable="true" bounds="[0,0][100,100]"/>
        <android.widget.Button resource-id="com.app:id/a" text="A" clickable="true" bounds="[0,100][100,200]"/>
        <android.widget.TextView text="Label" bounds="[0,200][100,300]"/>
      </android.widget.FrameLayout>
    </hierarchy>"#;

    let run = || {
        serde_json::to_string(&generate_elements(
            xml,
            Platform::Android,
            (1080, 1920),
            &FilterConfig::default(),
        ))
        .expect("serializes")
    };
    assert_eq!(run(), run());
}

#[test]
fn containers_with_content_survive_container_filtering() {
    let xml = r#"<hierarchy>
      <android.widget.FrameLayout bounds="[0,0][1080,1920]">
        <android.widget.LinearLayout bounds="[0,0][1080,400]">
          <android.widget.TextView text="Inner" bounds="[0,0][200,50]"/>
        </android.widget.LinearLayout>
        <android.widget.LinearLayout content-desc="Promo card" clickable="true" bounds="[0,400][1080,800]"/>
      </android.widget.FrameLayout>
    </hierarchy>"#;

    let elements = generate_elements(
        xml,
        Platform::Android,
        (1080, 1920),
        &FilterConfig::without_containers(Platform::Android),
    );

    // The content-bearing container is rescued, the bare one is not
    assert!(elements
        .iter()
        .any(|e| e.accessibility_id.as_deref() == Some("Promo card")));
    assert!(!elements
        .iter()
        .any(|e| e.tag_name == "android.widget.LinearLayout"
            && e.accessibility_id.is_none()));
}

#[test]
fn ios_duplicate_labels_disambiguate_via_class_chain_and_xpath() {
    let xml = r#"<XCUIElementTypeApplication name="Demo">
      <XCUIElementTypeWindow x="0" y="0" width="390" height="844">
        <XCUIElementTypeCell x="0" y="100" width="390" height="60" visible="true">
          <XCUIElementTypeStaticText label="Item" x="10" y="110" width="200" height="20" visible="true"/>
        </XCUIElementTypeCell>
        <XCUIElementTypeCell x="0" y="160" width="390" height="60" visible="true">
          <XCUIElementTypeStaticText label="Item" x="10" y="170" width="200" height="20" visible="true"/>
        </XCUIElementTypeCell>
      </XCUIElementTypeWindow>
    </XCUIElementTypeApplication>"#;

    let elements = generate_elements(xml, Platform::Ios, (390, 844), &FilterConfig::default());
    let texts: Vec<_> = elements
        .iter()
        .filter(|e| e.tag_name == "XCUIElementTypeStaticText")
        .collect();
    assert_eq!(texts.len(), 2);

    let doc = parse_document(xml).expect("document parse");
    for text in &texts {
        assert!(text.locators.get(&Strategy::PredicateString).is_none());
        let chain = text.locators.get(&Strategy::ClassChain).expect("class chain");
        assert!(chain.ends_with(']'), "expected indexed chain, got {}", chain);

        let xp = text.locators.get(&Strategy::Xpath).expect("xpath");
        let matches = xpath::evaluate(&doc, xp).expect("xpath evaluates");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0], doc.node_by_path(&text.path).expect("target"));
    }
}
