pub mod group;
pub mod level;
pub mod privilege;
pub mod status;
pub mod subject;
pub mod user;

pub use group::{
    GroupKind, GroupRecord, MenuLinkRecord, MenuLinkRow, MenuRecord, NewGroup, NewMenuLink,
    NewUserLink, UserLinkRecord, UserLinkRow,
};
pub use level::{
    LevelChanges, LevelRecord, NewLevel, NewSubjectLevel, SubjectLevelChanges,
    SubjectLevelRecord, SubjectLevelRow,
};
pub use privilege::Privilege;
pub use status::{LifecycleStatus, StatusRecord, StatusSummary, resolve_status};
pub use subject::{NewSubject, SubjectRecord};
pub use user::{NewUser, UserChanges, UserRecord};
