use std::ops::BitOr;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Actions a permission group may perform on a menu, stored as a bitmask.
///
/// On the wire it is an object such as `{"create":true,"read":true}`. The
/// legacy form, the same object encoded inside a JSON string, is also accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Privilege(u8);

impl Privilege {
    pub const NONE: Privilege = Privilege(0);
    pub const CREATE: Privilege = Privilege(1);
    pub const READ: Privilege = Privilege(1 << 1);
    pub const UPDATE: Privilege = Privilege(1 << 2);
    pub const DELETE: Privilege = Privilege(1 << 3);
    pub const ALL: Privilege = Privilege(0b1111);

    pub fn bits(self) -> i16 {
        i16::from(self.0)
    }

    /// Unknown bits are dropped.
    pub fn from_bits_truncate(bits: i16) -> Self {
        Privilege((bits as u8) & Self::ALL.0)
    }

    pub fn contains(self, other: Privilege) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for Privilege {
    type Output = Privilege;

    fn bitor(self, rhs: Privilege) -> Privilege {
        Privilege(self.0 | rhs.0)
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct PrivilegeFlags {
    create: bool,
    read: bool,
    update: bool,
    delete: bool,
}

impl From<PrivilegeFlags> for Privilege {
    fn from(flags: PrivilegeFlags) -> Self {
        let mut privilege = Privilege::NONE;
        for (set, bit) in [
            (flags.create, Privilege::CREATE),
            (flags.read, Privilege::READ),
            (flags.update, Privilege::UPDATE),
            (flags.delete, Privilege::DELETE),
        ] {
            if set {
                privilege = privilege | bit;
            }
        }
        privilege
    }
}

impl From<Privilege> for PrivilegeFlags {
    fn from(privilege: Privilege) -> Self {
        Self {
            create: privilege.contains(Privilege::CREATE),
            read: privilege.contains(Privilege::READ),
            update: privilege.contains(Privilege::UPDATE),
            delete: privilege.contains(Privilege::DELETE),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PrivilegeWire {
    Flags(PrivilegeFlags),
    Encoded(String),
}

impl Serialize for Privilege {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        PrivilegeFlags::from(*self).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Privilege {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match PrivilegeWire::deserialize(deserializer)? {
            PrivilegeWire::Flags(flags) => Ok(flags.into()),
            PrivilegeWire::Encoded(raw) => serde_json::from_str::<PrivilegeFlags>(&raw)
                .map(Privilege::from)
                .map_err(|e| D::Error::custom(format!("invalid privilege descriptor: {e}"))),
        }
    }
}
