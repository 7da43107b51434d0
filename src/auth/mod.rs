// Bearer token handling
// Tokens are issued by the identity service; this crate only needs to
// resolve the calling member from them

pub mod jwt;
