//! End-to-end pipeline tests against stubbed tools and a local HTTP server.

use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::thread;

use phix_diagrams::{
    DiagramReference, EmbedOptions, OutputLayout, Pipeline, PipelineConfig, Platform,
    RenderEnvironment, RenderOutcome, RenderRequest, SequenceStyle, SystemRenderer,
};
use phix_renderer::directive::Placement;

fn env(vars: &[(&str, &str)]) -> RenderEnvironment {
    let path = std::env::var("PATH").unwrap_or_default();
    RenderEnvironment::from_vars(vars.iter().copied(), Platform::Other).with_var("PATH", path)
}

fn pipeline(root: &Path, env: RenderEnvironment) -> Pipeline {
    // Proxy settings from the environment must not intercept the local stub server
    let agent = ureq::Agent::config_builder()
        .proxy(None)
        .http_status_as_error(false)
        .build()
        .into();
    Pipeline::new(
        PipelineConfig::new(OutputLayout::new(root, "_images")),
        env,
        SystemRenderer::new(agent),
    )
}

fn request(reference: DiagramReference) -> RenderRequest {
    RenderRequest {
        reference,
        embed: EmbedOptions::default(),
        postprocess: None,
    }
}

fn embedded_html(outcome: RenderOutcome) -> String {
    match outcome {
        RenderOutcome::Embedded { html } => html,
        RenderOutcome::Failed { source, reason } => {
            panic!("{} failed: {reason}", source.display())
        }
    }
}

/// Dia stand-in: `dia <src> -e <out>` copies the source.
#[cfg(unix)]
const FAKE_DIA: &str = r#"sh -c 'cp "$1" "$3"' dia"#;

/// ArgoUML stand-in: writes an SVG to the `ActionSaveGraphics` path.
#[cfg(unix)]
const FAKE_ARGOUML: &str = r#"sh -c 'for a; do case "$a" in org.argouml.uml.ui.ActionSaveGraphics=*) printf "<svg>model</svg>" > "${a#*=}";; esac; done' argouml"#;

#[cfg(unix)]
#[test]
fn dia_renders_into_image_dir() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("flow.dia");
    std::fs::write(&source, "<svg>flow</svg>").unwrap();
    let out = dir.path().join("out");

    let pipeline = pipeline(&out, env(&[("DIA_LAUNCH", FAKE_DIA)]));
    let html = embedded_html(pipeline.render_and_embed(
        &request(DiagramReference::Dia { source }),
        Some("_images"),
        Placement::Block,
    ));

    assert_eq!(
        std::fs::read_to_string(out.join("_images/flow.svg")).unwrap(),
        "<svg>flow</svg>"
    );
    assert!(html.contains(r#"<object data="_images/flow.svg" width="100%" height="100%" border="0""#));
}

#[cfg(unix)]
#[test]
fn existing_output_skips_the_tool() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("_images")).unwrap();
    std::fs::write(dir.path().join("_images/flow.svg"), "<svg>old</svg>").unwrap();

    // `false` would fail the render if it ran
    let pipeline = pipeline(dir.path(), env(&[("DIA_LAUNCH", "false")]));
    let outcome = pipeline.render_and_embed(
        &request(DiagramReference::Dia {
            source: PathBuf::from("/docs/flow.dia"),
        }),
        Some("_images"),
        Placement::Block,
    );

    assert!(matches!(outcome, RenderOutcome::Embedded { .. }));
    assert_eq!(
        std::fs::read_to_string(dir.path().join("_images/flow.svg")).unwrap(),
        "<svg>old</svg>"
    );
}

#[cfg(unix)]
#[test]
fn argouml_named_diagram_for_print() {
    let dir = tempfile::tempdir().unwrap();

    let pipeline = pipeline(dir.path(), env(&[("ARGOUML_LAUNCH", FAKE_ARGOUML)]));
    let html = embedded_html(pipeline.render_and_embed(
        &request(DiagramReference::ArgoUml {
            source: PathBuf::from("/docs/model.zargo"),
            diagram: "Class Diagram".to_owned(),
        }),
        None,
        Placement::Block,
    ));

    assert_eq!(
        std::fs::read_to_string(dir.path().join("model-Class_Diagram.svg")).unwrap(),
        "<svg>model</svg>"
    );
    assert!(html.starts_with(r#"<p class="argouml"><object data="model-Class_Diagram.svg""#));
}

#[cfg(unix)]
#[test]
fn failing_tool_yields_failure_and_no_file() {
    let dir = tempfile::tempdir().unwrap();

    let pipeline = pipeline(
        dir.path(),
        env(&[("INKSCAPE_LAUNCH", r#"sh -c 'printf partial > "${3#*=}"; exit 3' inkscape"#)]),
    );
    let outcome = pipeline.render_and_embed(
        &request(DiagramReference::Inkscape {
            source: PathBuf::from("/docs/logo.svg"),
        }),
        Some("_images"),
        Placement::Block,
    );

    let RenderOutcome::Failed { source, reason } = outcome else {
        panic!("expected failure");
    };
    assert_eq!(source, PathBuf::from("/docs/logo.svg"));
    assert!(reason.starts_with("could not launch Inkscape with command sh -c"));
    assert!(!dir.path().join("_images/logo.svg").exists());
}

#[cfg(unix)]
#[test]
fn postprocess_filter_rewrites_output() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("flow.dia");
    std::fs::write(&source, "<svg fill=\"red\"/>").unwrap();

    let pipeline = pipeline(
        dir.path(),
        env(&[("DIA_LAUNCH", FAKE_DIA), ("COLOR", "green")]),
    );
    let mut req = request(DiagramReference::Dia { source });
    req.postprocess = Some("sed s/red/${COLOR}/".to_owned());

    let outcome = pipeline.render_and_embed(&req, None, Placement::Block);

    assert!(matches!(outcome, RenderOutcome::Embedded { .. }));
    assert_eq!(
        std::fs::read_to_string(dir.path().join("flow.svg")).unwrap(),
        "<svg fill=\"green\"/>"
    );
}

#[test]
fn unset_postprocess_variable_spawns_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let marker = dir.path().join("launched");

    let launch = format!("touch {}", marker.display());
    let pipeline = pipeline(dir.path(), env(&[("DIA_LAUNCH", launch.as_str())]));
    let mut req = request(DiagramReference::Dia {
        source: PathBuf::from("/docs/flow.dia"),
    });
    req.postprocess = Some("$UNDEFINED_FILTER".to_owned());

    let outcome = pipeline.render_and_embed(&req, None, Placement::Block);

    assert!(matches!(outcome, RenderOutcome::Failed { ref reason, .. } if reason.contains("UNDEFINED_FILTER")));
    assert!(!marker.exists());
}

/// Serves `responses` in order, one connection each, recording every request.
fn serve(responses: Vec<String>) -> (String, Arc<Mutex<Vec<String>>>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}/", listener.local_addr().unwrap());
    let seen = Arc::new(Mutex::new(Vec::new()));
    let recorded = Arc::clone(&seen);

    thread::spawn(move || {
        for body in responses {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream);

            let mut head = String::new();
            let mut content_length = 0;
            loop {
                let mut line = String::new();
                reader.read_line(&mut line).unwrap();
                if let Some((name, value)) = line.split_once(':')
                    && name.eq_ignore_ascii_case("content-length")
                {
                    content_length = value.trim().parse().unwrap();
                }
                if line == "\r\n" || line.is_empty() {
                    break;
                }
                head.push_str(&line);
            }
            let mut payload = vec![0; content_length];
            reader.read_exact(&mut payload).unwrap();
            recorded
                .lock()
                .unwrap()
                .push(format!("{head}\n{}", String::from_utf8_lossy(&payload)));

            let mut stream = reader.into_inner();
            write!(
                stream,
                "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            )
            .unwrap();
        }
    });

    (url, seen)
}

fn sequence_request(dir: &Path, server_url: Option<String>) -> RenderRequest {
    let source = dir.join("login.wsd");
    std::fs::write(&source, "Alice->Bob: hello").unwrap();
    request(DiagramReference::SequenceDiagram {
        source,
        style: SequenceStyle::Napkin,
        api_version: "1".to_owned(),
        server_url,
    })
}

#[test]
fn sequence_diagram_round_trip_with_server() {
    let dir = tempfile::tempdir().unwrap();
    let (url, seen) = serve(vec![
        r#"{img: "?svg=mscAbC123", errors: []}"#.to_owned(),
        "<svg>sequence</svg>".to_owned(),
    ]);

    let pipeline = pipeline(dir.path(), env(&[]));
    let html = embedded_html(pipeline.render_and_embed(
        &sequence_request(dir.path(), Some(url)),
        Some("_images"),
        Placement::Block,
    ));

    assert!(html.starts_with(r#"<p class="websequencediagram">"#));
    assert_eq!(
        std::fs::read_to_string(dir.path().join("_images/login.svg")).unwrap(),
        "<svg>sequence</svg>"
    );

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 2);
    assert!(seen[0].starts_with("POST / HTTP/1.1"));
    for field in ["message=Alice", "style=napkin", "apiVersion=1", "format=svg"] {
        assert!(seen[0].contains(field), "missing {field} in {}", seen[0]);
    }
    assert!(seen[1].starts_with("GET /?svg=mscAbC123 HTTP/1.1"));
}

#[test]
fn sequence_environment_override_wins() {
    let dir = tempfile::tempdir().unwrap();
    let (url, seen) = serve(vec![
        "?svg=tok1".to_owned(),
        "<svg>from env</svg>".to_owned(),
    ]);

    let pipeline = pipeline(
        dir.path(),
        env(&[("PHIX_WEBSEQUENCEDIAGRAM_SERVER", url.as_str())]),
    );
    let outcome = pipeline.render_and_embed(
        &sequence_request(dir.path(), Some("http://127.0.0.1:9/".to_owned())),
        None,
        Placement::Block,
    );

    assert!(matches!(outcome, RenderOutcome::Embedded { .. }));
    assert_eq!(seen.lock().unwrap().len(), 2);
}

#[test]
fn sequence_invalid_response() {
    let dir = tempfile::tempdir().unwrap();
    let (url, _) = serve(vec![r#"{errors: ["Line 1: bad arrow"]}"#.to_owned()]);

    let pipeline = pipeline(dir.path(), env(&[]));
    let outcome = pipeline.render_and_embed(
        &sequence_request(dir.path(), Some(url)),
        None,
        Placement::Block,
    );

    let RenderOutcome::Failed { reason, .. } = outcome else {
        panic!("expected failure");
    };
    assert!(reason.starts_with("invalid response from server"));
    assert!(!dir.path().join("login.svg").exists());
}

#[test]
fn sequence_without_server_fails_before_network() {
    let dir = tempfile::tempdir().unwrap();

    let pipeline = pipeline(dir.path(), env(&[]));
    let outcome = pipeline.render_and_embed(
        &sequence_request(dir.path(), None),
        None,
        Placement::Block,
    );

    let RenderOutcome::Failed { reason, .. } = outcome else {
        panic!("expected failure");
    };
    assert!(reason.contains("server not specified"));
}
