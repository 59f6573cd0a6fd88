//! Device definitions.
//!
//! A device is a named participant of the network. Its kind decides which
//! extra details it carries: hosts have an address, routers and switches
//! have a management interface.

use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Kind-specific data of a device
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum DeviceKind {
    Router { mgmt_interface: Option<String> },
    Switch { mgmt_interface: Option<String> },
    Host { address: Option<IpAddr> },
}

/// Kind tag without the attached data, as written in topology files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeviceClass {
    Router,
    Switch,
    Host,
}

impl DeviceClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Router => "Router",
            Self::Switch => "Switch",
            Self::Host => "Host",
        }
    }
}

impl fmt::Display for DeviceClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeviceClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Router" | "router" => Ok(Self::Router),
            "Switch" | "switch" => Ok(Self::Switch),
            "Host" | "host" => Ok(Self::Host),
            other => Err(format!("unknown device kind '{}'", other)),
        }
    }
}

/// A registered network device
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    pub id: u32,
    pub name: String,
    #[serde(flatten)]
    pub kind: DeviceKind,
}

impl Device {
    pub fn router(id: u32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            kind: DeviceKind::Router { mgmt_interface: None },
        }
    }

    pub fn switch(id: u32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            kind: DeviceKind::Switch { mgmt_interface: None },
        }
    }

    pub fn host(id: u32, name: impl Into<String>, address: Option<IpAddr>) -> Self {
        Self {
            id,
            name: name.into(),
            kind: DeviceKind::Host { address },
        }
    }

    /// Build a device of `class` with no optional details set.
    pub fn of_class(class: DeviceClass, id: u32, name: impl Into<String>) -> Self {
        match class {
            DeviceClass::Router => Self::router(id, name),
            DeviceClass::Switch => Self::switch(id, name),
            DeviceClass::Host => Self::host(id, name, None),
        }
    }

    /// Set the management interface. Ignored for hosts.
    pub fn with_mgmt_interface(mut self, label: impl Into<String>) -> Self {
        match &mut self.kind {
            DeviceKind::Router { mgmt_interface } | DeviceKind::Switch { mgmt_interface } => {
                *mgmt_interface = Some(label.into());
            }
            DeviceKind::Host { .. } => {}
        }
        self
    }

    /// Set the address. Ignored for routers and switches.
    pub fn with_address(mut self, ip: IpAddr) -> Self {
        if let DeviceKind::Host { address } = &mut self.kind {
            *address = Some(ip);
        }
        self
    }

    pub fn class(&self) -> DeviceClass {
        match self.kind {
            DeviceKind::Router { .. } => DeviceClass::Router,
            DeviceKind::Switch { .. } => DeviceClass::Switch,
            DeviceKind::Host { .. } => DeviceClass::Host,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        self.class().as_str()
    }

    /// Routers and switches forward traffic; hosts only terminate it.
    pub fn is_network_device(&self) -> bool {
        !matches!(self.kind, DeviceKind::Host { .. })
    }

    pub fn mgmt_interface(&self) -> Option<&str> {
        match &self.kind {
            DeviceKind::Router { mgmt_interface } | DeviceKind::Switch { mgmt_interface } => {
                mgmt_interface.as_deref()
            }
            DeviceKind::Host { .. } => None,
        }
    }

    pub fn address(&self) -> Option<IpAddr> {
        match self.kind {
            DeviceKind::Host { address } => address,
            _ => None,
        }
    }

    /// Kind-specific detail as a single token (address or interface label).
    pub fn detail(&self) -> Option<String> {
        match &self.kind {
            DeviceKind::Host { address } => address.map(|ip| ip.to_string()),
            DeviceKind::Router { mgmt_interface } | DeviceKind::Switch { mgmt_interface } => {
                mgmt_interface.clone()
            }
        }
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} #{} {}", self.kind_name(), self.id, self.name)?;
        if let Some(detail) = self.detail() {
            write!(f, " ({})", detail)?;
        }
        Ok(())
    }
}
