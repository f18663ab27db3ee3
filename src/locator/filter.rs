use crate::locator::Platform;
use crate::source::SourceNode;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Tag names an agent can usefully act on. Entries are matched case-exact or
/// by ends-with/contains so package-qualified class names still hit.
const ANDROID_INTERACTABLE_TAGS: &[&str] = &[
    "android.widget.Button",
    "android.widget.ImageButton",
    "android.widget.EditText",
    "android.widget.AutoCompleteTextView",
    "android.widget.MultiAutoCompleteTextView",
    "android.widget.CheckBox",
    "android.widget.CheckedTextView",
    "android.widget.RadioButton",
    "android.widget.Switch",
    "android.widget.ToggleButton",
    "android.widget.Spinner",
    "android.widget.SeekBar",
    "android.widget.RatingBar",
    "android.widget.NumberPicker",
    "android.widget.DatePicker",
    "android.widget.TimePicker",
    "android.widget.SearchView",
    "android.widget.TextView",
    "android.widget.ImageView",
];

/// Layout chrome: view groups, scroll containers, navigation, windows
const ANDROID_CONTAINER_TAGS: &[&str] = &[
    "android.widget.FrameLayout",
    "android.widget.LinearLayout",
    "android.widget.RelativeLayout",
    "android.widget.TableLayout",
    "android.widget.TableRow",
    "android.widget.GridLayout",
    "android.widget.ScrollView",
    "android.widget.HorizontalScrollView",
    "android.widget.ListView",
    "android.widget.GridView",
    "android.view.ViewGroup",
    "androidx.recyclerview.widget.RecyclerView",
    "androidx.viewpager.widget.ViewPager",
    "androidx.constraintlayout.widget.ConstraintLayout",
    "androidx.coordinatorlayout.widget.CoordinatorLayout",
    "androidx.drawerlayout.widget.DrawerLayout",
    "androidx.core.widget.NestedScrollView",
    "androidx.appcompat.widget.Toolbar",
    "android.widget.Toolbar",
    "com.google.android.material.appbar.AppBarLayout",
    "com.google.android.material.tabs.TabLayout",
    "com.google.android.material.bottomnavigation.BottomNavigationView",
    "com.google.android.material.navigation.NavigationView",
    "hierarchy",
];

const IOS_INTERACTABLE_TAGS: &[&str] = &[
    "XCUIElementTypeButton",
    "XCUIElementTypeTextField",
    "XCUIElementTypeSecureTextField",
    "XCUIElementTypeTextView",
    "XCUIElementTypeStaticText",
    "XCUIElementTypeImage",
    "XCUIElementTypeSwitch",
    "XCUIElementTypeSlider",
    "XCUIElementTypeSegmentedControl",
    "XCUIElementTypeStepper",
    "XCUIElementTypePicker",
    "XCUIElementTypePickerWheel",
    "XCUIElementTypeLink",
    "XCUIElementTypeSearchField",
    "XCUIElementTypeCell",
    "XCUIElementTypeMenuItem",
];

const IOS_CONTAINER_TAGS: &[&str] = &[
    "XCUIElementTypeApplication",
    "XCUIElementTypeWindow",
    "XCUIElementTypeOther",
    "XCUIElementTypeGroup",
    "XCUIElementTypeScrollView",
    "XCUIElementTypeTable",
    "XCUIElementTypeCollectionView",
    "XCUIElementTypeNavigationBar",
    "XCUIElementTypeTabBar",
    "XCUIElementTypeToolbar",
    "XCUIElementTypeStatusBar",
    "XCUIElementTypeSheet",
];

/// Case-exact, ends-with or contains match, tolerating package prefixes
fn tag_matches(tag: &str, entry: &str) -> bool {
    tag == entry || tag.ends_with(entry) || tag.contains(entry)
}

fn tag_in_list(tag: &str, list: &[&str]) -> bool {
    list.iter().any(|entry| tag_matches(tag, entry))
}

fn tag_in_owned_list(tag: &str, list: &[String]) -> bool {
    list.iter().any(|entry| tag_matches(tag, entry))
}

/// Whether a node is something an agent can act on: a known interactable
/// tag, or (Android) any actionable attribute flag, or (iOS) accessible.
pub fn is_interactable(node: &SourceNode, platform: Platform) -> bool {
    match platform {
        Platform::Android => {
            tag_in_list(&node.tag_name, ANDROID_INTERACTABLE_TAGS)
                || node.bool_attr("clickable")
                || node.bool_attr("focusable")
                || node.bool_attr("checkable")
                || node.bool_attr("long-clickable")
        }
        Platform::Ios => {
            tag_in_list(&node.tag_name, IOS_INTERACTABLE_TAGS) || node.bool_attr("accessible")
        }
    }
}

/// Whether a node is layout chrome rather than content
pub fn is_layout_container(node: &SourceNode, platform: Platform) -> bool {
    let list = match platform {
        Platform::Android => ANDROID_CONTAINER_TAGS,
        Platform::Ios => IOS_CONTAINER_TAGS,
    };
    tag_in_list(&node.tag_name, list)
}

/// Whether a node carries user-visible content worth surfacing
pub fn has_meaningful_content(node: &SourceNode, platform: Platform) -> bool {
    if node.non_empty_attr("text").is_some() {
        return true;
    }
    match platform {
        Platform::Android => node.non_empty_attr("content-desc").is_some(),
        Platform::Ios => {
            node.non_empty_attr("label").is_some() || node.non_empty_attr("name").is_some()
        }
    }
}

/// Caller-supplied filter configuration for element selection
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct FilterConfig {
    /// Whitelist of tag names; empty = no restriction
    pub include_tag_names: Vec<String>,

    /// Blacklist of tag names; the synthetic root wrapper is always hidden
    pub exclude_tag_names: Vec<String>,

    /// Keep only nodes carrying at least one of these attributes
    pub require_attributes: Vec<String>,

    /// Minimum count of non-empty attributes
    pub min_attribute_count: usize,

    /// Keep only nodes the classifier deems interactable
    pub fetchable_only: bool,

    /// Keep only nodes whose clickable attribute is "true"
    pub clickable_only: bool,

    /// Keep only nodes reported as displayed (Android) / visible (iOS).
    /// A node without the attribute is not excluded.
    pub visible_only: bool,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            include_tag_names: Vec::new(),
            exclude_tag_names: vec!["hierarchy".to_string()],
            require_attributes: Vec::new(),
            min_attribute_count: 0,
            fetchable_only: false,
            clickable_only: false,
            visible_only: true,
        }
    }
}

impl FilterConfig {
    /// Default profile that additionally hides the platform's layout
    /// containers (text-bearing containers are rescued by the orchestrator)
    pub fn without_containers(platform: Platform) -> Self {
        let mut config = Self::default();
        let containers = match platform {
            Platform::Android => ANDROID_CONTAINER_TAGS,
            Platform::Ios => IOS_CONTAINER_TAGS,
        };
        config
            .exclude_tag_names
            .extend(containers.iter().map(|s| s.to_string()));
        config
    }
}

/// Composite inclusion gate over one node
pub fn should_include(node: &SourceNode, config: &FilterConfig, platform: Platform) -> bool {
    if !config.include_tag_names.is_empty()
        && !tag_in_owned_list(&node.tag_name, &config.include_tag_names)
    {
        return false;
    }

    if tag_in_owned_list(&node.tag_name, &config.exclude_tag_names) {
        return false;
    }

    if !config.require_attributes.is_empty()
        && !config
            .require_attributes
            .iter()
            .any(|attr| node.non_empty_attr(attr).is_some())
    {
        return false;
    }

    if config.min_attribute_count > 0 {
        let non_empty = node
            .attributes
            .values()
            .filter(|v| !v.is_empty())
            .count();
        if non_empty < config.min_attribute_count {
            return false;
        }
    }

    if config.clickable_only && !node.bool_attr("clickable") {
        return false;
    }

    if config.visible_only {
        let key = match platform {
            Platform::Android => "displayed",
            Platform::Ios => "visible",
        };
        if node.attr(key) == Some("false") {
            return false;
        }
    }

    if config.fetchable_only && !is_interactable(node, platform) {
        return false;
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_matching_tolerates_packages() {
        let node = SourceNode::new("com.example.custom.FancyButton");
        // "Button" is not in the list verbatim, but TextView suffixes are
        let tv = SourceNode::new("com.custom.widget.TextView");
        assert!(!tag_in_list(&node.tag_name, ANDROID_INTERACTABLE_TAGS));
        assert!(tag_in_list(&tv.tag_name, &["android.widget.TextView", "TextView"]));
    }

    #[test]
    fn test_is_interactable_android() {
        let button = SourceNode::new("android.widget.Button");
        assert!(is_interactable(&button, Platform::Android));

        let view = SourceNode::new("android.view.View");
        assert!(!is_interactable(&view, Platform::Android));

        let clickable_view =
            SourceNode::new("android.view.View").with_attribute("clickable", "true");
        assert!(is_interactable(&clickable_view, Platform::Android));

        let long_clickable =
            SourceNode::new("android.view.View").with_attribute("long-clickable", "true");
        assert!(is_interactable(&long_clickable, Platform::Android));
    }

    #[test]
    fn test_is_interactable_ios() {
        let button = SourceNode::new("XCUIElementTypeButton");
        assert!(is_interactable(&button, Platform::Ios));

        let other = SourceNode::new("XCUIElementTypeOther");
        assert!(!is_interactable(&other, Platform::Ios));

        let accessible =
            SourceNode::new("XCUIElementTypeOther").with_attribute("accessible", "true");
        assert!(is_interactable(&accessible, Platform::Ios));
    }

    #[test]
    fn test_is_layout_container() {
        assert!(is_layout_container(
            &SourceNode::new("android.widget.LinearLayout"),
            Platform::Android
        ));
        assert!(is_layout_container(
            &SourceNode::new("androidx.recyclerview.widget.RecyclerView"),
            Platform::Android
        ));
        assert!(is_layout_container(
            &SourceNode::new("XCUIElementTypeScrollView"),
            Platform::Ios
        ));
        assert!(!is_layout_container(
            &SourceNode::new("android.widget.Button"),
            Platform::Android
        ));
    }

    #[test]
    fn test_has_meaningful_content() {
        let text = SourceNode::new("android.widget.TextView").with_attribute("text", "Hello");
        assert!(has_meaningful_content(&text, Platform::Android));

        let null_text = SourceNode::new("android.widget.TextView").with_attribute("text", "null");
        assert!(!has_meaningful_content(&null_text, Platform::Android));

        let desc = SourceNode::new("android.widget.FrameLayout")
            .with_attribute("content-desc", "Card");
        assert!(has_meaningful_content(&desc, Platform::Android));

        let labeled = SourceNode::new("XCUIElementTypeOther").with_attribute("label", "Banner");
        assert!(has_meaningful_content(&labeled, Platform::Ios));
        assert!(!has_meaningful_content(&labeled, Platform::Android));
    }

    #[test]
    fn test_should_include_defaults_hide_root() {
        let config = FilterConfig::default();
        let root = SourceNode::new("hierarchy");
        assert!(!should_include(&root, &config, Platform::Android));

        let button = SourceNode::new("android.widget.Button");
        assert!(should_include(&button, &config, Platform::Android));
    }

    #[test]
    fn test_should_include_visible_only() {
        let config = FilterConfig::default();

        let hidden = SourceNode::new("XCUIElementTypeButton").with_attribute("visible", "false");
        assert!(!should_include(&hidden, &config, Platform::Ios));

        // Absent attribute is not a veto
        let unknown = SourceNode::new("XCUIElementTypeButton");
        assert!(should_include(&unknown, &config, Platform::Ios));

        let undisplayed =
            SourceNode::new("android.widget.Button").with_attribute("displayed", "false");
        assert!(!should_include(&undisplayed, &config, Platform::Android));
    }

    #[test]
    fn test_should_include_attribute_requirements() {
        let config = FilterConfig {
            require_attributes: vec!["resource-id".to_string(), "content-desc".to_string()],
            ..FilterConfig::default()
        };

        let with_id = SourceNode::new("android.widget.Button")
            .with_attribute("resource-id", "com.app:id/ok");
        assert!(should_include(&with_id, &config, Platform::Android));

        let bare = SourceNode::new("android.widget.Button");
        assert!(!should_include(&bare, &config, Platform::Android));

        let min = FilterConfig {
            min_attribute_count: 2,
            ..FilterConfig::default()
        };
        assert!(!should_include(&with_id, &min, Platform::Android));
    }

    #[test]
    fn test_should_include_clickable_and_fetchable() {
        let clickable = FilterConfig {
            clickable_only: true,
            ..FilterConfig::default()
        };
        let plain = SourceNode::new("android.widget.TextView");
        assert!(!should_include(&plain, &clickable, Platform::Android));

        let fetchable = FilterConfig {
            fetchable_only: true,
            ..FilterConfig::default()
        };
        let view = SourceNode::new("android.view.View");
        assert!(!should_include(&view, &fetchable, Platform::Android));
        let button = SourceNode::new("android.widget.Button");
        assert!(should_include(&button, &fetchable, Platform::Android));
    }

    #[test]
    fn test_without_containers_profile() {
        let config = FilterConfig::without_containers(Platform::Android);
        let layout = SourceNode::new("android.widget.LinearLayout");
        assert!(!should_include(&layout, &config, Platform::Android));

        let button = SourceNode::new("android.widget.Button");
        assert!(should_include(&button, &config, Platform::Android));
    }
}
