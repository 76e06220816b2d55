/// Top-level navigation branch shown by the app shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppFlow {
    Splash,
    Onboarding,
    Auth,
    Main,
}

impl AppFlow {
    /// Completed onboarding short-circuits every other branch once loading is done.
    pub fn resolve(loading: bool, logged_in: bool, onboarding_completed: bool) -> AppFlow {
        if loading {
            AppFlow::Splash
        } else if onboarding_completed {
            AppFlow::Main
        } else if logged_in {
            AppFlow::Onboarding
        } else {
            AppFlow::Auth
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn onboarding_completed_routes_to_main_regardless_of_login() {
        assert_eq!(AppFlow::resolve(false, true, true), AppFlow::Main);
        assert_eq!(AppFlow::resolve(false, false, true), AppFlow::Main);
    }

    #[test]
    fn remaining_branches() {
        assert_eq!(AppFlow::resolve(true, true, true), AppFlow::Splash);
        assert_eq!(AppFlow::resolve(false, true, false), AppFlow::Onboarding);
        assert_eq!(AppFlow::resolve(false, false, false), AppFlow::Auth);
    }
}
