use camino::{Utf8Path, Utf8PathBuf};
use diapath::bbox::PolyBBExtras;
use diapath::{BezPath, PathCombineMode, Rectangle, combine_path_data, parse_path_data};
use rayon::prelude::*;
use std::fs;

fn main() {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: cargo xtask <command>");
        eprintln!("Commands:");
        eprintln!("  gallery    Render every combine case to an HTML page");
        std::process::exit(1);
    }

    match args[1].as_str() {
        "gallery" => gallery(),
        _ => {
            eprintln!("Unknown command: {}", args[1]);
            std::process::exit(1);
        }
    }
}

/// What a case file asks for, as far as the gallery cares
struct Case {
    name: String,
    mode: PathCombineMode,
    a: String,
    b: String,
}

/// A case and what combining it produced
struct Rendered {
    case: Case,
    inputs: Vec<BezPath>,
    result: Result<Option<BezPath>, String>,
}

fn read_case(path: &Utf8Path) -> Result<Case, String> {
    let source = fs::read_to_string(path).map_err(|e| format!("{path}: {e}"))?;
    let mut mode = None;
    let mut a = String::new();
    let mut b = String::new();
    for line in source.lines().map(str::trim) {
        match line.split_once(':') {
            Some(("mode", value)) => mode = Some(value.trim().parse::<PathCombineMode>()?),
            Some(("a", value)) => a = value.trim().to_string(),
            Some(("b", value)) => b = value.trim().to_string(),
            _ => {}
        }
    }
    Ok(Case {
        name: path.file_stem().unwrap_or(path.as_str()).to_string(),
        mode: mode.ok_or_else(|| format!("{path}: no mode"))?,
        a,
        b,
    })
}

fn render_case(case: Case) -> Rendered {
    let inputs = [&case.a, &case.b]
        .into_iter()
        .filter_map(|d| parse_path_data(&case.name, d).ok())
        .collect();
    let result = combine_path_data(&case.a, &case.b, case.mode).map_err(|e| format!("{e:?}"));
    Rendered { case, inputs, result }
}

fn gallery() {
    let manifest_dir = Utf8Path::new(env!("CARGO_MANIFEST_DIR"));
    let root = manifest_dir.parent().unwrap_or(manifest_dir);
    let cases_dir = root.join("tests/cases");
    let output_path = root.join("target/gallery.html");

    let mut paths: Vec<Utf8PathBuf> = fs::read_dir(&cases_dir)
        .expect("Failed to read cases directory")
        .filter_map(|e| e.ok())
        .filter_map(|e| Utf8PathBuf::from_path_buf(e.path()).ok())
        .filter(|p| p.extension() == Some("case"))
        .collect();
    paths.sort();

    let rendered: Vec<Rendered> = paths
        .par_iter()
        .filter_map(|path| match read_case(path) {
            Ok(case) => Some(render_case(case)),
            Err(e) => {
                eprintln!("Skipping {e}");
                None
            }
        })
        .collect();

    let mut html = String::new();
    html.push_str(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8">
    <title>Path combination gallery</title>
    <style>
        body { font-family: system-ui, sans-serif; background: #eee; color: #333; margin: 24px; }
        .case { display: inline-block; vertical-align: top; background: #fff; margin: 8px; padding: 12px; border-radius: 6px; }
        .case h2 { font-size: 14px; margin: 0 0 8px; }
        .case pre { font-size: 11px; max-width: 420px; white-space: pre-wrap; }
        .error { color: #b00; }
        svg { background: #fafafa; border: 1px solid #ddd; }
    </style>
</head>
<body>
"#,
    );

    for item in &rendered {
        html.push_str(&case_html(item));
    }
    html.push_str("</body>\n</html>\n");

    if let Some(dir) = output_path.parent() {
        let _ = fs::create_dir_all(dir);
    }
    fs::write(&output_path, html).expect("Failed to write gallery");
    eprintln!("Wrote {} cases to {}", rendered.len(), output_path);
}

fn case_html(item: &Rendered) -> String {
    let mut bb = Rectangle::EMPTY;
    for path in &item.inputs {
        bb.union_with(&path.bounding_box(&PolyBBExtras::default(), true));
    }
    let bb = if bb.is_empty() { Rectangle::new(0.0, 0.0, 1.0, 1.0) } else { bb.inflate(0.5) };

    let mut svg = format!(
        r#"<svg width="200" height="200" viewBox="{} {} {} {}">"#,
        bb.left,
        bb.top,
        bb.width(),
        bb.height()
    );
    let stroke = bb.width().max(bb.height()) / 200.0;
    for (path, color) in item.inputs.iter().zip(["#48c", "#c84"]) {
        svg.push_str(&format!(
            r#"<path d="{path}" fill="{color}" fill-opacity="0.25" stroke="{color}" stroke-width="{stroke}"/>"#
        ));
    }

    let (result_svg, result_text) = match &item.result {
        Ok(Some(path)) => (
            format!(
                r##"<path d="{path}" fill="#333" fill-opacity="0.5" fill-rule="evenodd" stroke="#000" stroke-width="{}"/>"##,
                2.0 * stroke
            ),
            path.to_string(),
        ),
        Ok(None) => (String::new(), "none".to_string()),
        Err(e) => (String::new(), format!(r#"<span class="error">{}</span>"#, escape(e))),
    };
    svg.push_str(&result_svg);
    svg.push_str("</svg>");

    format!(
        "<div class=\"case\">\n<h2>{} ({})</h2>\n{}\n<pre>{}</pre>\n</div>\n",
        escape(&item.case.name),
        item.case.mode,
        svg,
        result_text
    )
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}
