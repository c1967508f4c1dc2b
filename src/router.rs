use serde::Serialize;

pub const CAMERA_FRAGMENT: &str = "#scratch";
pub const PLATFORM_FRAGMENT: &str = "#scan";

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum View {
    /// In-app camera loop
    Camera,
    /// Host platform scanner
    Platform,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", tag = "type", content = "target")]
pub enum Route {
    /// No fragment yet; the host should switch to the given one.
    Redirect(&'static str),
    Show(View),
    /// Unrecognized fragment, nothing changes
    Ignore,
}

impl Route {
    pub fn parse(fragment: &str) -> Self {
        match fragment.trim() {
            "" | "#" => Route::Redirect(CAMERA_FRAGMENT),
            CAMERA_FRAGMENT => Route::Show(View::Camera),
            PLATFORM_FRAGMENT => Route::Show(View::Platform),
            _ => Route::Ignore,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_fragment_redirects_to_camera() {
        assert_eq!(Route::parse(""), Route::Redirect(CAMERA_FRAGMENT));
        assert_eq!(Route::parse("#"), Route::Redirect(CAMERA_FRAGMENT));
    }

    #[test]
    fn known_fragments_select_views() {
        assert_eq!(Route::parse("#scratch"), Route::Show(View::Camera));
        assert_eq!(Route::parse("#scan"), Route::Show(View::Platform));
    }

    #[test]
    fn unknown_fragment_is_ignored() {
        assert_eq!(Route::parse("#settings"), Route::Ignore);
        assert_eq!(Route::parse("scan"), Route::Ignore);
    }

    #[test]
    fn route_serializes_for_the_webview() {
        let json = serde_json::to_string(&Route::Show(View::Platform)).unwrap();
        assert_eq!(json, r#"{"type":"show","target":"platform"}"#);
    }
}
