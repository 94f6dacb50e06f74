use samaj_shared::account::handle::{
    LoginDescriptor, LoginResult, RegisterDescriptor, RegisterResult, ViewProfileResult,
};

super::json_requests! {
    Register(RegisterDescriptor) => "/api/account/register": RegisterResult,
    Login(LoginDescriptor) => "/api/account/login": LoginResult,
}

super::empty_requests! {
    Logout => "/api/account/logout": (),
    /// Views the profile and role of the current session.
    ViewProfile => "/api/account/profile": ViewProfileResult,
}
