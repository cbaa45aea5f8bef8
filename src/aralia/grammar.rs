use std::sync::LazyLock;

use regex::Regex;

use mef_core::{Formula, Literal, Operator};

use super::error::{Error, Result};

/// ASCII NCName without `.`, `--`, or a trailing `-`.
const NAME: &str = r"[a-zA-Z][A-Za-z0-9_]*(?:-[A-Za-z0-9_]+)*";

fn literal() -> String {
    format!("~?{NAME}")
}

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|err| panic!("invalid grammar pattern {pattern}: {err}"))
}

/// Bracketed list of three or more literals.
fn args_list() -> String {
    let lit = literal();
    format!(r"\[(\s*{lit}(?:\s*,\s*{lit}\s*){{2,}})\]")
}

pub(super) static FT_NAME: LazyLock<Regex> =
    LazyLock::new(|| compile(&format!(r"^(?P<name>{NAME})$")));

pub(super) static PROBABILITY: LazyLock<Regex> = LazyLock::new(|| {
    compile(&format!(
        r"^p\(\s*(?P<name>{NAME})\s*\)\s*=\s*(?P<prob>1|0|0\.[0-9]+)$"
    ))
});

pub(super) static STATE: LazyLock<Regex> = LazyLock::new(|| {
    compile(&format!(
        r"^s\(\s*(?P<name>{NAME})\s*\)\s*=\s*(?P<state>true|false)$"
    ))
});

pub(super) static GATE: LazyLock<Regex> =
    LazyLock::new(|| compile(&format!(r"^(?P<name>{NAME})\s*:=\s*(?P<formula>.+)$")));

static PAREN: LazyLock<Regex> = LazyLock::new(|| compile(r"^\(([^()]+)\)$"));

static OR: LazyLock<Regex> = LazyLock::new(|| {
    let lit = literal();
    compile(&format!(r"^({lit}(?:\s*\|\s*{lit}\s*)+)$"))
});

static AND: LazyLock<Regex> = LazyLock::new(|| {
    let lit = literal();
    compile(&format!(r"^({lit}(?:\s*&\s*{lit}\s*)+)$"))
});

static XOR: LazyLock<Regex> = LazyLock::new(|| {
    let lit = literal();
    compile(&format!(r"^({lit}\s*\^\s*{lit})$"))
});

static ATLEAST: LazyLock<Regex> = LazyLock::new(|| {
    compile(&format!(r"^@\(\s*([2-9])\s*,\s*{}\s*\)\s*$", args_list()))
});

static CARDINALITY: LazyLock<Regex> = LazyLock::new(|| {
    compile(&format!(
        r"^#\(\s*([0-9])\s*,\s*([0-9])\s*,\s*{}\s*\)\s*$",
        args_list()
    ))
});

static NOT: LazyLock<Regex> =
    LazyLock::new(|| compile(&format!(r"^~\(\s*({})\s*\)$", literal())));

static NULL: LazyLock<Regex> = LazyLock::new(|| compile(&format!(r"^({})$", literal())));

static IMPLY: LazyLock<Regex> = LazyLock::new(|| {
    let lit = literal();
    compile(&format!(r"^({lit}\s*=>\s*{lit})$"))
});

static IFF: LazyLock<Regex> = LazyLock::new(|| {
    let lit = literal();
    compile(&format!(r"^({lit}\s*<=>\s*{lit})$"))
});

fn split_arguments(arguments: &str, separator: &str) -> Vec<Literal> {
    arguments
        .trim()
        .split(separator)
        .map(Literal::parse)
        .collect()
}

fn capture<'t>(re: &Regex, text: &'t str, group: usize) -> Option<&'t str> {
    re.captures(text)
        .and_then(|caps| caps.get(group))
        .map(|m| m.as_str())
}

fn digit(text: &str) -> Result<u32> {
    text.parse()
        .map_err(|_| Error::parsing(format!("Invalid number in the formula: {text}")))
}

fn build(operator: Operator, arguments: Vec<Literal>) -> Result<Formula> {
    Ok(Formula::new(operator, arguments)?)
}

/// Reads the right-hand side of a gate definition.
///
/// One pair of enclosing parentheses is optional; operators cannot be mixed
/// or nested within a single formula.
pub fn parse_formula(text: &str) -> Result<Formula> {
    let mut line = text.trim();
    if let Some(inner) = capture(&PAREN, line, 1) {
        line = inner.trim();
    }

    if let Some(args) = capture(&OR, line, 1) {
        return build(Operator::Or, split_arguments(args, "|"));
    }
    if let Some(args) = capture(&XOR, line, 1) {
        return build(Operator::Xor, split_arguments(args, "^"));
    }
    if let Some(args) = capture(&AND, line, 1) {
        return build(Operator::And, split_arguments(args, "&"));
    }
    if let Some(caps) = ATLEAST.captures(line) {
        let min = digit(&caps[1])?;
        return build(Operator::Atleast { min }, split_arguments(&caps[2], ","));
    }
    if let Some(arg) = capture(&NOT, line, 1) {
        return build(Operator::Not, vec![Literal::parse(arg)]);
    }
    if let Some(arg) = capture(&NULL, line, 1) {
        return build(Operator::Null, vec![Literal::parse(arg)]);
    }
    if let Some(args) = capture(&IMPLY, line, 1) {
        return build(Operator::Imply, split_arguments(args, "=>"));
    }
    if let Some(args) = capture(&IFF, line, 1) {
        return build(Operator::Iff, split_arguments(args, "<=>"));
    }
    if let Some(caps) = CARDINALITY.captures(line) {
        let min = digit(&caps[1])?;
        let max = digit(&caps[2])?;
        return build(
            Operator::Cardinality { min, max },
            split_arguments(&caps[3], ","),
        );
    }

    Err(Error::parsing(format!("Cannot interpret the formula:\n{line}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aralia::ErrorKind;

    fn names(formula: &Formula) -> Vec<String> {
        formula.arguments().iter().map(ToString::to_string).collect()
    }

    #[test]
    fn name_patterns() {
        for name in [
            "Period",
            "With-Dash",
            "With_Under",
            "With__Dunder",
            "WithNumber42",
            "Correct-Name_42",
        ] {
            assert!(FT_NAME.is_match(name), "{name}");
        }
        for name in [
            "Contains Whitespace Characters",
            "Peri.od",
            "EndWithDash-",
            "Double--Dash",
            "42StartWithNumbers",
            "__under__",
            "~Not",
            "Not~a",
            "!Not",
            "&And",
            "And&",
        ] {
            assert!(!FT_NAME.is_match(name), "{name}");
        }
    }

    #[test]
    fn operators() {
        let cases = [
            ("(e1 | ~e2)", Operator::Or, vec!["e1", "~e2"]),
            ("e1 ^ e2", Operator::Xor, vec!["e1", "e2"]),
            ("e1 & e2 & g3", Operator::And, vec!["e1", "e2", "g3"]),
            (
                "@(2, [g5, e3, e4])",
                Operator::Atleast { min: 2 },
                vec!["g5", "e3", "e4"],
            ),
            ("~(e3)", Operator::Not, vec!["e3"]),
            ("~(~e2)", Operator::Not, vec!["~e2"]),
            ("~e2", Operator::Null, vec!["~e2"]),
            ("g8", Operator::Null, vec!["g8"]),
            ("(a => b)", Operator::Imply, vec!["a", "b"]),
            ("a <=> b", Operator::Iff, vec!["a", "b"]),
            (
                "#(2, 4, [e1, e2, e3, e4, g5])",
                Operator::Cardinality { min: 2, max: 4 },
                vec!["e1", "e2", "e3", "e4", "g5"],
            ),
        ];
        for (text, operator, args) in cases {
            let formula = parse_formula(text).unwrap();
            assert_eq!(formula.operator(), operator, "{text}");
            assert_eq!(names(&formula), args, "{text}");
        }
    }

    #[test]
    fn whitespace_is_flexible() {
        let formula = parse_formula("  (  e1|e2  |  e3 )  ").unwrap();
        assert_eq!(names(&formula), ["e1", "e2", "e3"]);
        let formula = parse_formula("@( 3 ,[a,b , c,d ] )").unwrap();
        assert_eq!(formula.operator(), Operator::Atleast { min: 3 });
    }

    #[test]
    fn rejects_malformed_formulas() {
        for text in [
            "g2 + e1",
            "g2 * e1",
            "-e1",
            "g2 / e1",
            "(3 == (e1 + e2 + e3))",
            "(1, [e1, e2, e3])",
            "(2, [])",
            "(2, [e1])",
            "(2, [e1, e2])",
            "(-1, [e1, e2, e3])",
            "a | b)",
            "(a | b",
            "((a | b)",
            "((a | b))",
            "e1 | e2 ^ e3",
            "e1 | e2 & e3",
            "e1 | @(2, [e2, e3, e4])",
            "e1 ^ e2 ^ e3",
            "e1 ^ e2 & e3",
            "~~e1",
            "~e1~a",
            "e1 => e2 => e3",
            "e1 => e2 || e3",
            "e1 <=> e2 <=> e3",
            "e1 <=> e2 || e3",
            "@(1, [a, b, c])",
        ] {
            let err = parse_formula(text).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Parsing, "{text}");
        }
    }

    #[test]
    fn structural_errors() {
        for text in ["e1 & e1", "@(3, [a, b, c])", "@(4, [a, b, c])", "#(3, 2, [a, b, c])", "#(1, 4, [a, b, c])"] {
            let err = parse_formula(text).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::FaultTree, "{text}");
        }
    }
}
