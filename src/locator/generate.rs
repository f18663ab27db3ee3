use crate::locator::filter::{
    has_meaningful_content, is_layout_container, should_include, FilterConfig,
};
use crate::locator::synthesize::LocatorSynthesizer;
use crate::locator::{Platform, Strategy};
use crate::source::{parse_source, Bounds, SourceNode};
use indexmap::IndexMap;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Viewport dimension reported when the driver cannot measure the window;
/// treated as "everything is on screen".
pub const UNKNOWN_VIEWPORT: i64 = 9999;

/// One UI element with its synthesized locators and geometry, ready for
/// serialization to a tool response.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ElementWithLocators {
    pub tag_name: String,
    /// Strategy -> selector value, best first
    pub locators: IndexMap<Strategy, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accessibility_id: Option<String>,
    pub clickable: bool,
    pub enabled: bool,
    pub displayed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bounds: Option<Bounds>,
    pub in_viewport: bool,
    /// Dot-separated child-index path from the root, stable within one capture
    pub path: String,
}

/// Walk a page-source capture and synthesize locators for every element the
/// filter admits. Returns an empty list (logged) when the capture cannot be
/// parsed at all; individual element failures never abort the walk.
pub fn generate_elements(
    xml: &str,
    platform: Platform,
    viewport: (i64, i64),
    config: &FilterConfig,
) -> Vec<ElementWithLocators> {
    let parsed = parse_source(xml);
    let root = match parsed.tree {
        Some(root) => root,
        None => {
            log::warn!("Skipping locator generation: page source did not parse");
            return Vec::new();
        }
    };

    let synthesizer =
        LocatorSynthesizer::new(platform, parsed.document.as_ref(), xml, Some(&root));

    let mut elements = Vec::new();
    let mut stack: Vec<&SourceNode> = vec![&root];
    while let Some(node) = stack.pop() {
        for child in node.children.iter().rev() {
            stack.push(child);
        }

        // Containers normally filtered out are kept when they carry real
        // content, e.g. a clickable card whose text lives on the wrapper.
        let included = should_include(node, config, platform)
            || (is_layout_container(node, platform) && has_meaningful_content(node, platform));
        if !included {
            continue;
        }

        let target = parsed
            .document
            .as_ref()
            .and_then(|doc| doc.node_by_path(&node.path));
        let locators = synthesizer.synthesize(node, target);
        if locators.is_empty() {
            continue;
        }

        elements.push(build_element(node, locators, platform, viewport));
    }

    elements
}

fn build_element(
    node: &SourceNode,
    locators: IndexMap<Strategy, String>,
    platform: Platform,
    viewport: (i64, i64),
) -> ElementWithLocators {
    let bounds = Bounds::from_node(node, platform);
    let in_viewport = bounds
        .map(|b| b.in_viewport(viewport.0, viewport.1))
        .unwrap_or(false);

    let (resource_id, accessibility_id, displayed) = match platform {
        Platform::Android => (
            node.non_empty_attr("resource-id").map(str::to_string),
            node.non_empty_attr("content-desc").map(str::to_string),
            node.attr("displayed").map(|v| v == "true").unwrap_or(true),
        ),
        Platform::Ios => (
            None,
            node.non_empty_attr("name").map(str::to_string),
            node.attr("visible").map(|v| v == "true").unwrap_or(true),
        ),
    };

    ElementWithLocators {
        tag_name: node.tag_name.clone(),
        locators,
        text: match platform {
            Platform::Android => node.non_empty_attr("text").map(str::to_string),
            Platform::Ios => node
                .non_empty_attr("label")
                .or_else(|| node.non_empty_attr("value"))
                .map(str::to_string),
        },
        resource_id,
        accessibility_id,
        clickable: node.bool_attr("clickable"),
        enabled: node.attr("enabled").map(|v| v == "true").unwrap_or(true),
        displayed,
        bounds,
        in_viewport,
        path: node.path.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ANDROID_PAGE: &str = r#"<hierarchy rotation="0">
      <android.widget.FrameLayout bounds="[0,0][1080,1920]">
        <android.widget.LinearLayout bounds="[0,0][1080,1920]">
          <android.widget.Button resource-id="com.app:id/login" text="Log in" clickable="true" enabled="true" bounds="[40,1500][1040,1640]"/>
          <android.widget.EditText resource-id="com.app:id/email" text="" clickable="true" bounds="[40,400][1040,540]"/>
          <android.widget.TextView text="Forgot password?" clickable="true" bounds="[40,1700][500,1760]"/>
          <android.widget.TextView text="Offscreen footer" bounds="[40,2000][500,2060]"/>
        </android.widget.LinearLayout>
      </android.widget.FrameLayout>
    </hierarchy>"#;

    #[test]
    fn test_generate_elements_android() {
        let elements = generate_elements(
            ANDROID_PAGE,
            Platform::Android,
            (1080, 1920),
            &FilterConfig::default(),
        );

        let login = elements
            .iter()
            .find(|e| e.resource_id.as_deref() == Some("com.app:id/login"))
            .unwrap();
        assert_eq!(login.tag_name, "android.widget.Button");
        assert!(login.clickable);
        assert!(login.in_viewport);
        assert_eq!(login.text.as_deref(), Some("Log in"));
        assert_eq!(
            login.locators.get(&Strategy::Id).map(String::as_str),
            Some("com.app:id/login")
        );
        assert_eq!(login.bounds.unwrap().y, 1500);

        let footer = elements
            .iter()
            .find(|e| e.text.as_deref() == Some("Offscreen footer"))
            .unwrap();
        assert!(!footer.in_viewport);
    }

    #[test]
    fn test_elements_are_document_order() {
        let elements = generate_elements(
            ANDROID_PAGE,
            Platform::Android,
            (1080, 1920),
            &FilterConfig::default(),
        );
        let paths: Vec<&str> = elements.iter().map(|e| e.path.as_str()).collect();
        let mut sorted = paths.clone();
        sorted.sort_by_key(|p| {
            p.split('.')
                .map(|s| s.parse::<usize>().unwrap())
                .collect::<Vec<_>>()
        });
        assert_eq!(paths, sorted);
    }

    #[test]
    fn test_generation_is_idempotent() {
        let first = generate_elements(
            ANDROID_PAGE,
            Platform::Android,
            (1080, 1920),
            &FilterConfig::default(),
        );
        let second = generate_elements(
            ANDROID_PAGE,
            Platform::Android,
            (1080, 1920),
            &FilterConfig::default(),
        );
        let a = serde_json::to_string(&first).unwrap();
        let b = serde_json::to_string(&second).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_unparseable_source_yields_empty() {
        let elements = generate_elements(
            "<hierarchy><broken>",
            Platform::Android,
            (1080, 1920),
            &FilterConfig::default(),
        );
        assert!(elements.is_empty());
    }

    #[test]
    fn test_container_with_content_is_rescued() {
        let xml = r#"<hierarchy>
          <android.widget.FrameLayout bounds="[0,0][1080,1920]">
            <android.widget.LinearLayout content-desc="Promo card" clickable="true" bounds="[0,0][1080,300]"/>
          </android.widget.FrameLayout>
        </hierarchy>"#;
        let elements = generate_elements(
            xml,
            Platform::Android,
            (1080, 1920),
            &FilterConfig::without_containers(Platform::Android),
        );
        assert!(elements
            .iter()
            .any(|e| e.accessibility_id.as_deref() == Some("Promo card")));
    }

    const IOS_PAGE: &str = r#"<XCUIElementTypeApplication name="Demo" x="0" y="0" width="390" height="844">
      <XCUIElementTypeWindow x="0" y="0" width="390" height="844">
        <XCUIElementTypeButton name="submit" label="Submit" x="20" y="700" width="350" height="44" visible="true" enabled="true"/>
        <XCUIElementTypeStaticText label="Hello" x="20" y="100" width="350" height="20" visible="true"/>
      </XCUIElementTypeWindow>
    </XCUIElementTypeApplication>"#;

    #[test]
    fn test_generate_elements_ios() {
        let elements = generate_elements(
            IOS_PAGE,
            Platform::Ios,
            (390, 844),
            &FilterConfig::default(),
        );

        let submit = elements
            .iter()
            .find(|e| e.accessibility_id.as_deref() == Some("submit"))
            .unwrap();
        assert_eq!(submit.tag_name, "XCUIElementTypeButton");
        assert!(submit.in_viewport);
        assert_eq!(submit.text.as_deref(), Some("Submit"));
        assert!(submit.locators.contains_key(&Strategy::AccessibilityId));

        let hello = elements
            .iter()
            .find(|e| e.text.as_deref() == Some("Hello"))
            .unwrap();
        assert!(hello.displayed);
    }

    #[test]
    fn test_unknown_viewport_keeps_everything_in_viewport() {
        let elements = generate_elements(
            ANDROID_PAGE,
            Platform::Android,
            (UNKNOWN_VIEWPORT, UNKNOWN_VIEWPORT),
            &FilterConfig::default(),
        );
        assert!(elements.iter().all(|e| e.bounds.is_none() || e.in_viewport));
    }
}
