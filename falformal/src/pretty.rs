//! RcDoc-based pretty-printer with termcolor annotations for [`Formula`].
//!
//! Role
//! - Convert a formula into an annotated document suitable for width-aware
//!   rendering, with colored output for terminals (TTY-aware) and plain
//!   strings for logs.
//! - This rendering is minimally parenthesized for humans; the *canonical*
//!   form used for equality and hashing is `Formula`'s `Display` and is
//!   deliberately independent of this module.

use pretty::{FmtWrite, RcDoc, RenderAnnotated};
use std::io::{self, Write};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::formula::{ComparisonOp, Formula, FormulaKind, TemporalOp};

/// Styles used to annotate parts of the pretty-printed document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    Punct, // commas, interval brackets
    /// Parentheses are colored by nesting depth so matching pairs share a color.
    Paren(u8),
    Temporal, // [], <>, X, U
    Operator, // &&, ||, !
    Signal,   // signal references
    Num,      // thresholds and interval bounds
}

impl Style {
    fn to_color_spec(self) -> ColorSpec {
        let mut s = ColorSpec::new();
        match self {
            Style::Punct => {
                s.set_dimmed(true);
            }
            Style::Paren(depth) => {
                // Rotate through a palette for nested parentheses.
                let fg = match depth % 6 {
                    0 => Color::Blue,
                    1 => Color::Green,
                    2 => Color::White,
                    3 => Color::Yellow,
                    4 => Color::Red,
                    5 => Color::Magenta,
                    _ => unreachable!(),
                };
                s.set_fg(Some(fg)).set_dimmed(true);
            }
            Style::Temporal => {
                s.set_fg(Some(Color::Cyan)).set_bold(true);
            }
            Style::Operator => {
                s.set_fg(Some(Color::Yellow)).set_bold(true);
            }
            Style::Signal => {
                s.set_fg(Some(Color::Green)).set_bold(true);
            }
            Style::Num => {
                s.set_fg(Some(Color::Magenta));
            }
        }
        s
    }
}

fn punct(s: &'static str) -> RcDoc<'static, Style> {
    RcDoc::as_string(s).annotate(Style::Punct)
}

#[inline]
fn lparen(depth: u8) -> RcDoc<'static, Style> {
    RcDoc::as_string("(").annotate(Style::Paren(depth))
}

#[inline]
fn rparen(depth: u8) -> RcDoc<'static, Style> {
    RcDoc::as_string(")").annotate(Style::Paren(depth))
}

fn temporal(s: String) -> RcDoc<'static, Style> {
    RcDoc::as_string(s).annotate(Style::Temporal)
}

fn op(s: &'static str) -> RcDoc<'static, Style> {
    RcDoc::as_string(s).annotate(Style::Operator)
}

fn calculate_precedence(k: FormulaKind) -> u8 {
    use FormulaKind::*;

    match k {
        Until => 1,
        Or => 2,
        And => 3,
        Not => 4,
        Next | Global | Eventually | Bounded => 5,
        Atomic => 255,
    }
}

#[inline]
fn requires_parens(current: FormulaKind, parent: Option<FormulaKind>) -> bool {
    match parent {
        None => false,
        Some(pk) => {
            // Chains of the same associative connective read fine unparenthesized.
            let allow_self_chain = matches!(current, FormulaKind::And | FormulaKind::Or);

            let current_prec = calculate_precedence(current);
            let parent_prec = calculate_precedence(pk);
            (parent_prec > current_prec)
                || (parent_prec == current_prec && current != pk)
                || (parent_prec == current_prec && !allow_self_chain)
        }
    }
}

#[inline]
fn to_doc_parenthesized_with_depth(
    f: &Formula,
    parent: FormulaKind,
    depth: u8,
) -> RcDoc<'static, Style> {
    let need = requires_parens(f.kind(), Some(parent));
    if need {
        lparen(depth)
            .append(to_doc_with_depth(f, depth + 1))
            .append(rparen(depth))
            .group()
    } else {
        to_doc_with_depth(f, depth)
    }
}

/// Depth-aware variant that colors parentheses by nesting level.
fn to_doc_with_depth(f: &Formula, depth: u8) -> RcDoc<'static, Style> {
    match f {
        Formula::Atomic {
            signal,
            cmp,
            threshold,
        } => RcDoc::as_string(format!("signal({signal})"))
            .annotate(Style::Signal)
            .append(RcDoc::space())
            .append(op(match cmp {
                ComparisonOp::Less => "<",
                ComparisonOp::Greater => ">",
                ComparisonOp::Equal => "==",
            }))
            .append(RcDoc::space())
            .append(RcDoc::as_string(format!("{threshold}")).annotate(Style::Num))
            .group(),
        Formula::Not(a) => op("!")
            .append(to_doc_parenthesized_with_depth(a, FormulaKind::Not, depth))
            .group(),
        Formula::And(a, b) => to_doc_parenthesized_with_depth(a, FormulaKind::And, depth)
            .append(RcDoc::space())
            .append(op("&&"))
            .append(RcDoc::space())
            .append(to_doc_parenthesized_with_depth(b, FormulaKind::And, depth))
            .group(),
        Formula::Or(a, b) => to_doc_parenthesized_with_depth(a, FormulaKind::Or, depth)
            .append(RcDoc::space())
            .append(op("||"))
            .append(RcDoc::space())
            .append(to_doc_parenthesized_with_depth(b, FormulaKind::Or, depth))
            .group(),
        Formula::Next(a) => temporal("X".to_string())
            .append(RcDoc::space())
            .append(to_doc_parenthesized_with_depth(a, FormulaKind::Next, depth))
            .group(),
        Formula::Global(a) => temporal("[]".to_string())
            .append(RcDoc::space())
            .append(to_doc_parenthesized_with_depth(
                a,
                FormulaKind::Global,
                depth,
            ))
            .group(),
        Formula::Eventually(a) => temporal("<>".to_string())
            .append(RcDoc::space())
            .append(to_doc_parenthesized_with_depth(
                a,
                FormulaKind::Eventually,
                depth,
            ))
            .group(),
        Formula::Until(a, b) => to_doc_parenthesized_with_depth(a, FormulaKind::Until, depth)
            .append(RcDoc::space())
            .append(temporal("U".to_string()))
            .append(RcDoc::space())
            .append(to_doc_parenthesized_with_depth(b, FormulaKind::Until, depth))
            .group(),
        Formula::Bounded {
            op: top,
            from,
            to,
            child,
        } => temporal(
            match top {
                TemporalOp::Global => "[]",
                TemporalOp::Eventually => "<>",
            }
            .to_string(),
        )
        .append(punct("_["))
        .append(RcDoc::as_string(format!("{from}")).annotate(Style::Num))
        .append(punct(", "))
        .append(RcDoc::as_string(format!("{to}")).annotate(Style::Num))
        .append(punct("]"))
        .append(RcDoc::space())
        .append(to_doc_parenthesized_with_depth(
            child,
            FormulaKind::Bounded,
            depth,
        ))
        .group(),
    }
}

// A writer that maps Style annotations to termcolor ColorSpec on a WriteColor sink.
struct ColorWriter<'w, W: WriteColor + Write> {
    out: &'w mut W,
}

impl<'a, 'w, W: WriteColor + Write> RenderAnnotated<'a, Style> for ColorWriter<'w, W> {
    fn push_annotation(&mut self, ann: &'a Style) -> io::Result<()> {
        self.out.set_color(&ann.to_color_spec())
    }
    fn pop_annotation(&mut self) -> io::Result<()> {
        self.out.reset()
    }
}

impl<'w, W: WriteColor + Write> pretty::Render for ColorWriter<'w, W> {
    type Error = io::Error;
    fn write_str(&mut self, s: &str) -> io::Result<usize> {
        self.out.write_all(s.as_bytes())?;
        Ok(s.len())
    }
    fn write_str_all(&mut self, s: &str) -> io::Result<()> {
        self.out.write_all(s.as_bytes())
    }
    fn fail_doc(&self) -> Self::Error {
        io::Error::other("render failed")
    }
}

/// Render a document to a `termcolor::WriteColor` with width-aware layout.
fn render_to<W: WriteColor + Write>(
    doc: &RcDoc<'_, Style>,
    width: usize,
    out: &mut W,
) -> io::Result<()> {
    let mut cw = ColorWriter { out };
    doc.render_raw(width, &mut cw)
}

/// Convenience: retrieve the width of the terminal, or 80 if it cannot be determined.
fn terminal_width() -> usize {
    term_size::dimensions().map(|(w, _)| w).unwrap_or(80)
}

/// Pretty-printing conveniences for formulas.
pub trait PrettyFormula {
    /// Build an annotated document for this formula, for manual composition
    /// or rendering.
    fn pretty_doc(&self) -> RcDoc<'static, Style>;

    /// Render with colors to any termcolor writer at the given width.
    fn pretty_render_to<W: WriteColor + Write>(&self, width: usize, out: &mut W) -> io::Result<()>;

    /// Print to stdout with colors (TTY-aware) at auto-detected width.
    fn pretty_print(&self) -> io::Result<()>;

    /// Format into a plain string (no colors), width 80.
    fn pretty_string(&self) -> String;
}

impl PrettyFormula for Formula {
    #[inline]
    fn pretty_doc(&self) -> RcDoc<'static, Style> {
        to_doc_with_depth(self, 0)
    }

    #[inline]
    fn pretty_render_to<W: WriteColor + Write>(&self, width: usize, out: &mut W) -> io::Result<()> {
        let doc = self.pretty_doc();
        render_to(&doc, width, out)
    }

    fn pretty_print(&self) -> io::Result<()> {
        let stdout = StandardStream::stdout(ColorChoice::Auto);
        let mut stdout = stdout.lock();
        let doc = self.pretty_doc();
        render_to(&doc, terminal_width(), &mut stdout)
    }

    fn pretty_string(&self) -> String {
        let mut buf = String::new();
        let mut w = FmtWrite::new(&mut buf);
        let _ = self.pretty_doc().render_raw(80, &mut w);
        buf
    }
}
