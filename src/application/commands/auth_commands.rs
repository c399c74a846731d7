//! Auth Commands

/// 注册顾客账号
#[derive(Debug, Clone)]
pub struct RegisterUser {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// 登录
#[derive(Debug, Clone)]
pub struct Login {
    pub email: String,
    pub password: String,
}

/// 启动时创建管理员（邮箱已存在则跳过）
#[derive(Debug, Clone)]
pub struct BootstrapAdmin {
    pub name: String,
    pub email: String,
    pub password: String,
}
