// Domain layer: companies, the permission catalog, roles and access grants
pub mod access_grant;
pub mod company;
pub mod permission_module;
pub mod role;
