use std::fmt;

use shared::domain::CreatorId;

/// Navigable pages of the app.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Route {
    #[default]
    List,
    New,
    Detail(CreatorId),
    Edit(CreatorId),
}

impl Route {
    /// Unknown paths fall back to the list.
    pub fn parse(path: &str) -> Self {
        let path = path
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .trim()
            .trim_end_matches('/');
        let segments: Vec<&str> = path
            .trim_start_matches('/')
            .split('/')
            .filter(|segment| !segment.is_empty())
            .collect();

        match segments.as_slice() {
            ["new"] => Self::New,
            ["creators", id] => parse_id(id).map(Self::Detail).unwrap_or_default(),
            ["creators", id, "edit"] => parse_id(id).map(Self::Edit).unwrap_or_default(),
            _ => Self::List,
        }
    }

    pub fn path(self) -> String {
        match self {
            Self::List => "/".to_string(),
            Self::New => "/new".to_string(),
            Self::Detail(id) => format!("/creators/{id}"),
            Self::Edit(id) => format!("/creators/{id}/edit"),
        }
    }

    pub fn creator_id(self) -> Option<CreatorId> {
        match self {
            Self::Detail(id) | Self::Edit(id) => Some(id),
            Self::List | Self::New => None,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

fn parse_id(raw: &str) -> Option<CreatorId> {
    raw.parse::<i64>().ok().map(CreatorId)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_page_path() {
        assert_eq!(Route::parse("/"), Route::List);
        assert_eq!(Route::parse(""), Route::List);
        assert_eq!(Route::parse("/new"), Route::New);
        assert_eq!(Route::parse("/creators/12"), Route::Detail(CreatorId(12)));
        assert_eq!(Route::parse("/creators/12/"), Route::Detail(CreatorId(12)));
        assert_eq!(Route::parse("/creators/12/edit"), Route::Edit(CreatorId(12)));
        assert_eq!(Route::parse("/creators/12?tab=info"), Route::Detail(CreatorId(12)));
    }

    #[test]
    fn unknown_paths_fall_back_to_list() {
        assert_eq!(Route::parse("/creators/abc"), Route::List);
        assert_eq!(Route::parse("/creators"), Route::List);
        assert_eq!(Route::parse("/settings"), Route::List);
    }

    #[test]
    fn paths_render_back_to_their_route() {
        for route in [
            Route::List,
            Route::New,
            Route::Detail(CreatorId(3)),
            Route::Edit(CreatorId(3)),
        ] {
            assert_eq!(Route::parse(&route.path()), route);
        }
        assert_eq!(Route::Edit(CreatorId(3)).to_string(), "/creators/3/edit");
    }
}
