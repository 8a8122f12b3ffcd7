//! Result projection

use serde::Serialize;

/// What a command emits on success
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Projection<T> {
    /// The authoritative representation returned by the collaborator
    Resource(T),

    Resources(Vec<T>),

    /// `--pass-thru` result
    Flag(bool),
}

impl<T> Projection<T> {
    /// Project a successful mutation, honouring `pass_thru`
    pub fn of(resource: T, pass_thru: bool) -> Self {
        if pass_thru {
            Projection::Flag(true)
        } else {
            Projection::Resource(resource)
        }
    }

    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> Projection<U> {
        match self {
            Projection::Resource(r) => Projection::Resource(f(r)),
            Projection::Resources(rs) => Projection::Resources(rs.into_iter().map(f).collect()),
            Projection::Flag(b) => Projection::Flag(b),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pass_thru_emits_flag() {
        assert_eq!(Projection::of("cluster", true), Projection::Flag(true));
        assert_eq!(Projection::of("cluster", false), Projection::Resource("cluster"));
        assert_eq!(serde_json::to_string(&Projection::<u8>::Flag(true)).unwrap(), "true");
    }
}
