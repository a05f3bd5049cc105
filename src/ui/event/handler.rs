use crate::app::action::Action;

use super::HostRequest;

pub fn parse_request(line: &str) -> Result<HostRequest, serde_json::Error> {
    serde_json::from_str(line)
}

pub fn handle_request(request: HostRequest) -> Action {
    match request {
        HostRequest::Open { path, trusted } => Action::Open { path, trusted },
        HostRequest::Save { path } => Action::Saved { path },
        HostRequest::Change { path, content } => Action::Changed { path, content },
        HostRequest::Message { path, message } => Action::ViewMessage { path, message },
        HostRequest::Close { path } => Action::Close { path },
        HostRequest::Shutdown => Action::Quit,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::path::PathBuf;

    #[rstest]
    #[case(r#"{"type":"save","path":"/ws/a.sv"}"#, Action::Saved { path: PathBuf::from("/ws/a.sv") })]
    #[case(r#"{"type":"close","path":"/ws/a.sv"}"#, Action::Close { path: PathBuf::from("/ws/a.sv") })]
    #[case(r#"{"type":"shutdown"}"#, Action::Quit)]
    #[case(
        r#"{"type":"open","path":"/ws/a.sv","trusted":false}"#,
        Action::Open { path: PathBuf::from("/ws/a.sv"), trusted: false }
    )]
    #[case(
        r#"{"type":"open","path":"/ws/a.sv","trusted":true}"#,
        Action::Open { path: PathBuf::from("/ws/a.sv"), trusted: true }
    )]
    #[case(
        r#"{"type":"open","path":"/ws/a.sv"}"#,
        Action::Open { path: PathBuf::from("/ws/a.sv"), trusted: false }
    )]
    #[case(
        r#"{"type":"change","path":"/ws/a.sv","content":"module a; endmodule"}"#,
        Action::Changed { path: PathBuf::from("/ws/a.sv"), content: "module a; endmodule".into() }
    )]
    fn maps_request_to_action(#[case] line: &str, #[case] expected: Action) {
        let action = handle_request(parse_request(line).unwrap());

        assert_eq!(action, expected);
    }

    #[rstest]
    #[case("not json")]
    #[case(r#"{"type":"explode"}"#)]
    #[case(r#"{"type":"save"}"#)]
    fn rejects_malformed_lines(#[case] line: &str) {
        assert!(parse_request(line).is_err());
    }
}
