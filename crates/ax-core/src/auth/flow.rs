/// Which entry path produced the current authentication attempt.
///
/// Several transitions branch on this: biometric-setup skip tears the whole
/// session down on the signup path but proceeds to the main app on the login
/// path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum AuthFlow {
    Login,
    Signup,
}
