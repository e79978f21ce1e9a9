//! Wire types exchanged with the OneFS platform API.

mod access_key;
mod acl_entry;
mod bucket;
mod user;

pub use access_key::{AccessKey, KeyEnvelope};
pub use acl_entry::{AclEntry, AclPermission, Grantee};
pub use bucket::{AclUpdate, Bucket, BucketList, ObjectAclPolicy};
pub use user::{User, UserList};
