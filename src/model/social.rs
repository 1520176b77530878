use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// Social networks an applicant can link a profile from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SocialNetwork {
    Vk,
    Fb,
    Twitter,
    Lj,
}

impl SocialNetwork {
    pub const ALL: [SocialNetwork; 4] = [Self::Vk, Self::Fb, Self::Twitter, Self::Lj];

    pub fn key(self) -> &'static str {
        match self {
            Self::Vk => "vk",
            Self::Fb => "fb",
            Self::Twitter => "twitter",
            Self::Lj => "lj",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Self::Vk => "ВКонтакте",
            Self::Fb => "Facebook",
            Self::Twitter => "Twitter",
            Self::Lj => "LiveJournal",
        }
    }

    /// Name of the accessor for this network, e.g. `social_vk`.
    pub fn accessor(self) -> String {
        format!("social_{}", self.key())
    }

    /// Resolve an accessor name back to its network.
    pub fn from_accessor(name: &str) -> Option<Self> {
        let key = name.strip_prefix("social_")?;
        Self::ALL.into_iter().find(|network| network.key() == key)
    }
}

impl Display for SocialNetwork {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Names of all social accessors.
pub fn social_methods() -> Vec<String> {
    SocialNetwork::ALL.into_iter().map(SocialNetwork::accessor).collect()
}

/// Profile links or handles, keyed by network.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SocialLinks(BTreeMap<SocialNetwork, String>);

impl SocialLinks {
    pub fn get(&self, network: SocialNetwork) -> Option<&str> {
        self.0.get(&network).map(String::as_str)
    }

    /// Store a link, or remove it when `None`.
    pub fn set(&mut self, network: SocialNetwork, link: Option<String>) {
        match link {
            Some(link) => {
                self.0.insert(network, link);
            }
            None => {
                self.0.remove(&network);
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (SocialNetwork, &str)> {
        self.0.iter().map(|(network, link)| (*network, link.as_str()))
    }
}

/// Whether a profile value looks like a link rather than a bare handle.
/// Advisory only; the network is not inspected.
pub fn is_valid_social_link(link: &str, _network: Option<SocialNetwork>) -> bool {
    link.starts_with("http://") || link.starts_with("https://")
}
