//! Property tests for program duplication.
//!
//! Random function bodies (some of them ill-formed) are duplicated; the copy
//! must resolve to the same diagnostics and the same tree.

use lumen_ast::{BinaryOp, VarKind};
use lumen_diagnostic::Severity;
use lumen_ir::{Span, TypeId};
use lumen_program::{init_tracing, FunctionSig, Program, ProgramBuilder, Session};
use proptest::prelude::*;

const NAMES: [&str; 4] = ["a", "b", "float", "x"];

/// One statement of a generated body.
#[derive(Clone, Debug)]
enum Step {
    /// `var NAMES[n]: f32 = value;`
    Declare(u8, u16),
    /// `NAMES[n] = NAMES[m] + NAMES[m];`
    Add(u8, u8),
    Return,
}

fn step() -> impl Strategy<Value = Step> {
    prop_oneof![
        (0u8..4, any::<u16>()).prop_map(|(n, v)| Step::Declare(n, v)),
        (0u8..4, 0u8..4).prop_map(|(n, m)| Step::Add(n, m)),
        Just(Step::Return),
    ]
}

fn span(at: usize) -> Span {
    let at = u32::try_from(at).unwrap_or(u32::MAX - 1);
    Span::new(at, at + 1)
}

fn build(steps: &[Step]) -> Program {
    let mut b = ProgramBuilder::new(&Session::new());
    let mut body = Vec::new();
    for (i, s) in steps.iter().enumerate() {
        let at = span(i);
        let stmt = match *s {
            Step::Declare(n, v) => {
                let init = b.lit_f32(f32::from(v), at);
                b.local(VarKind::Var, NAMES[usize::from(n)], Some(TypeId::F32), Some(init), at)
            }
            Step::Add(n, m) => {
                let lhs = b.ident(NAMES[usize::from(n)], at);
                let l = b.ident(NAMES[usize::from(m)], at);
                let r = b.ident(NAMES[usize::from(m)], at);
                let sum = b.binary(BinaryOp::Add, l, r, at);
                b.assign(lhs, sum, at)
            }
            Step::Return => b.ret(None, at),
        };
        body.push(stmt);
    }
    b.function("f", &FunctionSig::new(), &body, span(usize::from(u16::MAX)));
    b.build()
}

fn summary(program: &Program) -> Vec<(Severity, String, Span)> {
    program
        .diagnostics()
        .iter()
        .map(|d| (d.severity, d.message.clone(), d.span))
        .collect()
}

proptest! {
    #[test]
    fn duplicate_reproduces_diagnostics(steps in proptest::collection::vec(step(), 0..12)) {
        init_tracing();
        let program = build(&steps);
        let copy = program.duplicate();

        prop_assert_ne!(copy.generation(), program.generation());
        prop_assert_eq!(copy.is_valid(), program.is_valid());
        prop_assert_eq!(summary(&copy), summary(&program));
        prop_assert_eq!(copy.ast().node_count(), program.ast().node_count());
    }

    #[test]
    fn duplicating_twice_is_deterministic(steps in proptest::collection::vec(step(), 0..12)) {
        let program = build(&steps);
        let first = program.duplicate();
        let second = program.duplicate();

        let names = |p: &Program| p.symbols().iter().map(|(_, n)| n.to_owned()).collect::<Vec<_>>();
        prop_assert_eq!(names(&first), names(&second));
        prop_assert_eq!(summary(&first), summary(&second));
        prop_assert_eq!(first.types().len(), second.types().len());
    }
}

#[test]
fn renaming_keeps_valid_programs_valid() {
    use lumen_program::transform::{Manager, Renamer};

    let program = build(&[Step::Declare(2, 1), Step::Declare(3, 2), Step::Add(2, 3)]);
    assert!(program.is_valid(), "{}", program.render_diagnostics());

    let out = Manager::new()
        .with(Renamer::hlsl())
        .run(&program)
        .expect("renaming a valid program succeeds");
    assert!(out.is_valid());
    assert!(out.symbols().get("float_").is_some());
}
