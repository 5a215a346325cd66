//! Launcher result items for action listings.
//!
//! Serialized as the Alfred Script Filter JSON format:
//!
//! ```json
//! {"items":[{"uid":"open","title":"Open","arg":"open","valid":true,
//!   "icon":{"path":"/wf/icons/url.png"},
//!   "variables":{"BROWSER_ACTIONS_ACTION":"open","BROWSER_ACTIONS_KIND":"url","action":"url-action"},
//!   "mods":{"cmd":{"subtitle":"Blacklist action","arg":"open","valid":true,...}}}]}
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::Serialize;

use crate::actions::{ActionDescriptor, ActionKind};
use crate::executor::{ENV_ACTION, ENV_KIND};

/// Workflow variable naming the follow-up operation
pub const VAR_NEXT: &str = "action";
pub const NEXT_BLACKLIST: &str = "blacklist";

const ICON_BLACKLIST_ADD: &str = "icons/blacklist-add.png";
const ICON_WARNING: &str = "icons/warning.png";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Icon {
    pub path: String,
}

impl Icon {
    fn new(path: &Path) -> Self {
        Icon {
            path: path.to_string_lossy().into_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Text {
    pub copy: String,
}

/// Alternate behaviour while a modifier is held
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Modifier {
    pub subtitle: String,
    pub arg: String,
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<Icon>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub variables: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Item {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arg: Option<String>,
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<Icon>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<Text>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub variables: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub mods: BTreeMap<String, Modifier>,
}

impl Item {
    /// Non-actionable item shown when nothing matched.
    pub fn warning(title: &str, subtitle: &str, bundled_dir: &Path) -> Self {
        Item {
            uid: None,
            title: title.to_string(),
            subtitle: Some(subtitle.to_string()),
            arg: None,
            valid: false,
            icon: Some(Icon::new(&bundled_dir.join(ICON_WARNING))),
            text: None,
            variables: BTreeMap::new(),
            mods: BTreeMap::new(),
        }
    }

    /// Item for one action. Holding ⌘ blacklists it instead.
    pub fn for_action(action: &ActionDescriptor, bundled_dir: &Path) -> Self {
        let next = match action.kind {
            ActionKind::Tab => "tab-action",
            ActionKind::Url => "url-action",
        };

        let mut variables = BTreeMap::new();
        variables.insert(ENV_ACTION.to_string(), action.name.clone());
        variables.insert(ENV_KIND.to_string(), action.kind.to_string());
        variables.insert(VAR_NEXT.to_string(), next.to_string());

        let mut mods = BTreeMap::new();
        mods.insert(
            "cmd".to_string(),
            Modifier {
                subtitle: "Blacklist action".to_string(),
                arg: action.name.clone(),
                valid: true,
                icon: Some(Icon::new(&bundled_dir.join(ICON_BLACKLIST_ADD))),
                variables: BTreeMap::from([(VAR_NEXT.to_string(), NEXT_BLACKLIST.to_string())]),
            },
        );

        Item {
            uid: Some(format!("{}:{}", action.kind, action.name)),
            title: action.title.clone(),
            subtitle: Some(format!("{} action · {}", action.kind, action.name)),
            arg: Some(action.name.clone()),
            valid: true,
            icon: Some(Icon::new(&action.icon)),
            text: Some(Text {
                copy: action.title.clone(),
            }),
            variables,
            mods,
        }
    }
}

/// A full launcher response
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Feedback {
    pub items: Vec<Item>,
}

impl Feedback {
    /// Items for `actions`, keeping those whose title or name contains
    /// `query` (case-insensitive). An empty result becomes a warning item.
    pub fn for_actions<'a>(
        actions: impl IntoIterator<Item = &'a ActionDescriptor>,
        query: Option<&str>,
        bundled_dir: &Path,
    ) -> Self {
        let query = query
            .map(|q| q.trim().to_lowercase())
            .filter(|q| !q.is_empty());

        let items: Vec<Item> = actions
            .into_iter()
            .filter(|action| match &query {
                Some(q) => {
                    action.title.to_lowercase().contains(q.as_str())
                        || action.name.to_lowercase().contains(q.as_str())
                }
                None => true,
            })
            .map(|action| Item::for_action(action, bundled_dir))
            .collect();

        if items.is_empty() {
            return Feedback {
                items: vec![Item::warning(
                    "No actions found",
                    "Try a different query?",
                    bundled_dir,
                )],
            };
        }
        Feedback { items }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
