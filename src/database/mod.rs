// 数据库模块
// 实体模型与无状态操作集，全部走运行期查询接口

pub mod models;
pub mod operations;

pub use models::online::OnlineEntity;
pub use models::user::{UserEntity, UserProfileUpdate};
pub use operations::online::OnlineOperations;
pub use operations::power::PowerOperations;
pub use operations::user::UserOperations;
