// 会话子系统
// 会话记录与用户索引存放在带 TTL 的缓存服务中，
// 注册表是两者唯一的写入方，其他模块只通过它读取

pub mod codec;
pub mod keys;
pub mod model;
pub mod policy;
pub mod registry;
pub mod store;

pub use model::{SessionSeed, SourceType, UserSession};
pub use policy::{SessionPolicy, SessionTtls};
pub use registry::SessionRegistry;
pub use store::{RedisSessionStore, SessionStore};
