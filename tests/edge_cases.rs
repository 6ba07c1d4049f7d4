use ppd::{
    compile_reader, compile_str, compile_str_with, compile_with, render_str, DirectiveConfig, Error,
    SymbolSet,
};
use std::collections::{BTreeMap, HashMap, HashSet};

// ── Directive errors ──

fn compile_err(template: &str) -> Error {
    match compile_str(template) {
        Ok(t) => panic!("{:?} compiled to {:?}", template, t),
        Err(err) => err,
    }
}

#[test]
fn missing_expression_is_directive_error() {
    for template in [
        "#if\n#endif\n",
        "\n#if \n#endif\n",
        "\nline 1\n#if foo\n#elif \n#endif\n",
        "\nline 1\n#if foo\n#elif\n#endif\n",
    ] {
        assert!(compile_err(template).is_directive_syntax(), "{:?}", template);
    }
}

#[test]
fn unterminated_blocks_are_directive_errors() {
    for template in [
        "#if x\n",
        "\n#if foo\n#else\n",
        "\n#if foo\n#elif bar\n",
        "\nline 1\n#if foo\n#elif bar\n#else\n",
        "\nline 1\n#if foo\n    #if foo\n#endif\n",
        "\nline 1\n#if foo\n    #if foo\n    #else\n#endif\n",
    ] {
        assert!(compile_err(template).is_directive_syntax(), "{:?}", template);
    }
}

#[test]
fn stray_directives_are_directive_errors() {
    for template in ["#endif", "a\n#else\nb", "#elif x", "#if x\n#else\n#else\n#endif", "# just a comment"] {
        assert!(compile_err(template).is_directive_syntax(), "{:?}", template);
    }
}

#[test]
fn bad_guard_is_expression_error_with_line() {
    let err = compile_err("\n#if foo and\n#endif\n");
    assert!(err.is_expression_syntax());
    assert_eq!(err.line(), Some(2));
    assert_eq!(
        err.to_string(),
        "invalid expression syntax at line 2: unexpected end of expression"
    );
}

#[test]
fn nested_missing_expression_still_directive_error() {
    let err = compile_err("\nline 1\n#if foo\n    #if foo\n    #elif\n    #else\n#endif\n");
    assert!(err.is_directive_syntax());
    assert_eq!(err.line(), Some(5));
}

#[test]
fn pathological_nesting_fails_cleanly() {
    let depth = 100_000;
    let mut template = "#if x\n".repeat(depth);
    template.push_str(&"#endif\n".repeat(depth));
    assert!(matches!(
        compile_str(&template),
        Err(Error::NestingTooDeep { limit: 256, line: Some(257) })
    ));
}

#[test]
fn long_flat_guards_compile_under_default_limits() -> anyhow::Result<()> {
    for op in [" or ", " and "] {
        let guard = (0..300).map(|i| format!("s{}", i)).collect::<Vec<_>>().join(op);
        let template = compile_str(&format!("#if {}\nyes\n#endif", guard))?;
        assert_eq!(template.render(&SymbolSet::from(["s0", "s299"])), "yes");
        assert_eq!(template.render(&SymbolSet::new()), "");
    }
    Ok(())
}

#[test]
fn oversized_flat_guard_fails_cleanly() {
    let guard = (0..5_000).map(|i| format!("s{}", i)).collect::<Vec<_>>().join(" and ");
    assert!(matches!(
        compile_str(&format!("#if {}\n#endif", guard)),
        Err(Error::NestingTooDeep { limit: 4096, line: Some(1) })
    ));
}

// ── Configuration ──

#[test]
fn custom_prefix() -> anyhow::Result<()> {
    let config = DirectiveConfig::new("//@")?;
    let template = compile_str_with("a\n//@IF x\nb\n//@endif\n#if stays literal", &config)?;
    assert_eq!(template.render(&SymbolSet::from(["x"])), "a\nb\n#if stays literal");
    assert_eq!(template.render(&SymbolSet::new()), "a\n#if stays literal");
    Ok(())
}

#[test]
fn invalid_prefix_is_config_error() {
    assert!(matches!(DirectiveConfig::new(""), Err(Error::InvalidConfig(_))));
    assert!(matches!(DirectiveConfig::new("# "), Err(Error::InvalidConfig(_))));
}

#[test]
fn depth_limit_is_configurable() -> anyhow::Result<()> {
    let config = DirectiveConfig::default().with_max_depth(1)?;
    assert!(compile_with(["#if a", "#endif"], &config).is_ok());
    assert!(matches!(
        compile_with(["#if a", "#if b", "#endif", "#endif"], &config),
        Err(Error::NestingTooDeep { limit: 1, .. })
    ));
    // Parentheses share the limit; flat chains do not.
    assert!(compile_with(["#if (a)", "#endif"], &config).is_ok());
    assert!(matches!(
        compile_with(["#if ((a))", "#endif"], &config),
        Err(Error::NestingTooDeep { limit: 1, line: Some(1) })
    ));
    assert!(compile_with(["#if a and b or c and d", "#endif"], &config).is_ok());
    Ok(())
}

// ── Symbol sources ──

#[test]
fn map_keys_are_symbols() -> anyhow::Result<()> {
    let template = compile_str("#if feature\non\n#else\noff\n#endif")?;

    let mut hash = HashMap::new();
    hash.insert("feature", false);
    assert_eq!(template.render(&SymbolSet::from(&hash)), "on");

    let mut tree = BTreeMap::new();
    tree.insert("other".to_string(), ());
    assert_eq!(template.render(&SymbolSet::from(&tree)), "off");

    let set: HashSet<String> = ["feature".to_string()].into_iter().collect();
    assert_eq!(template.render(&SymbolSet::from(set)), "on");

    assert_eq!(render_str("#if a\nyes\n#endif", vec!["a"])?, "yes");
    Ok(())
}

// ── Reader input ──

#[test]
fn reader_input() -> anyhow::Result<()> {
    let source = "header\r\n#if win\r\nwindows\r\n#else\r\nunix\r\n#endif\r\n";
    let template = compile_reader(source.as_bytes(), &DirectiveConfig::default())?;
    assert_eq!(template.render(&SymbolSet::from(["win"])), "header\nwindows");
    assert_eq!(template.render(&SymbolSet::new()), "header\nunix");
    Ok(())
}

#[test]
fn trailing_text_after_endif_is_ignored() -> anyhow::Result<()> {
    let template = compile_str("#if x\nyes\n#else  not x\nno\n#endif x")?;
    assert_eq!(template.render(&SymbolSet::new()), "no");
    Ok(())
}
