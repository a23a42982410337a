//! Textual serialization of an IR program.

use std::io::{self, Write};

use crate::ir::{
    ConstRepr, Constant, DataDef, DataItem, Def, DefKind, Field, Function, Instr, IrType, Layout,
    Program, Statement, TypeDef, Value,
};

/// Writes `program` to `out`, one definition at a time in program order.
/// Output is deterministic: the same program always serializes to the same
/// bytes.
pub fn emit<W: Write>(program: &Program, out: &mut W) -> io::Result<()> {
    for def in &program.defs {
        emit_def(def, out)?;
    }
    Ok(())
}

/// Writes an IR type. Aggregates render as `:name` in aggregate-accepting
/// positions and degrade to `l` elsewhere; void renders as nothing.
fn emit_qtype<W: Write>(ty: IrType, aggr: bool, out: &mut W) -> io::Result<()> {
    match ty {
        IrType::Byte => write!(out, "b"),
        IrType::Half => write!(out, "h"),
        IrType::Word => write!(out, "w"),
        IrType::Long => write!(out, "l"),
        IrType::Single => write!(out, "s"),
        IrType::Double => write!(out, "d"),
        IrType::Aggregate(name) => {
            if aggr {
                write!(out, ":{}", name)
            } else {
                write!(out, "l")
            }
        }
        IrType::Void => Ok(()),
    }
}

fn emit_type_def<W: Write>(def: &Def, ty: &TypeDef, out: &mut W) -> io::Result<()> {
    if let Some(describes) = &ty.describes {
        writeln!(out, "# {}", describes)?;
    }
    write!(out, "type :{} =", def.name)?;
    if let Some(align) = ty.align {
        write!(out, " align {}", align)?;
    }
    write!(out, " {{")?;

    match &ty.layout {
        Layout::Fields(fields) => emit_fields(fields, out)?,
        Layout::Union(alternatives) => {
            for fields in alternatives {
                write!(out, " {{")?;
                emit_fields(fields, out)?;
                write!(out, " }}")?;
            }
        }
    }

    write!(out, " }}\n\n")
}

fn emit_fields<W: Write>(fields: &[Field], out: &mut W) -> io::Result<()> {
    for (i, field) in fields.iter().enumerate() {
        if let Some(ty) = field.ty {
            write!(out, " ")?;
            emit_qtype(ty, true, out)?;
        }
        if let Some(count) = field.count {
            write!(out, " {}", count)?;
        }
        if i + 1 < fields.len() {
            write!(out, ",")?;
        }
    }
    Ok(())
}

fn emit_const<W: Write>(value: &Constant, out: &mut W) -> io::Result<()> {
    match value.repr {
        ConstRepr::Word(v) => write!(out, "{}", v),
        ConstRepr::Long(v) => write!(out, "{}", v as i64),
        ConstRepr::Single(v) => write!(out, "s_{:.6}", v),
        ConstRepr::Double(v) => write!(out, "d_{:.6}", v),
    }
}

fn emit_value<W: Write>(value: &Value, out: &mut W) -> io::Result<()> {
    match value {
        Value::Constant(c) => emit_const(c, out),
        Value::Global { name, .. } => write!(out, "${}", name),
        Value::Label { name, .. } => write!(out, "@{}", name),
        Value::Temporary { name, .. } => write!(out, "%{}", name),
    }
}

/// `call $callee(T0 v0, T1 v1, ...)`: the callee is printed bare; every
/// other argument is printed with its type, aggregates in aggregate form.
fn emit_call<W: Write>(instr: Instr, args: &[Value], out: &mut W) -> io::Result<()> {
    write!(out, "{} ", instr.name())?;

    let (callee, rest) = args.split_first().expect("call statement without callee");
    emit_value(callee, out)?;
    write!(out, "(")?;

    for (i, arg) in rest.iter().enumerate() {
        if i > 0 {
            write!(out, ", ")?;
        }
        emit_qtype(arg.ty(), true, out)?;
        write!(out, " ")?;
        emit_value(arg, out)?;
    }

    writeln!(out, ")")
}

fn emit_stmt<W: Write>(stmt: &Statement, out: &mut W) -> io::Result<()> {
    match stmt {
        Statement::Comment(text) => writeln!(out, "\t# {}", text),
        Statement::Label(name) => writeln!(out, "@{}", name),
        Statement::Instruction {
            instr,
            out: outval,
            args,
        } => {
            write!(out, "\t")?;
            if *instr == Instr::Call {
                if let Some(outval) = outval {
                    emit_value(outval, out)?;
                    write!(out, " =")?;
                    emit_qtype(outval.ty(), true, out)?;
                    write!(out, " ")?;
                }
                return emit_call(*instr, args, out);
            }
            if let Some(outval) = outval {
                emit_value(outval, out)?;
                write!(out, " =")?;
                emit_qtype(outval.ty(), false, out)?;
                write!(out, " ")?;
            }
            write!(out, "{}{}", instr.name(), if args.is_empty() { "" } else { " " })?;
            for (i, arg) in args.iter().enumerate() {
                if i > 0 {
                    write!(out, ", ")?;
                }
                emit_value(arg, out)?;
            }
            writeln!(out)
        }
    }
}

fn emit_func<W: Write>(def: &Def, func: &Function, out: &mut W) -> io::Result<()> {
    write!(
        out,
        "{}function section \".text.{}\" \"ax\"",
        if def.exported { "export " } else { "" },
        def.name
    )?;
    if func.returns != IrType::Void {
        write!(out, " ")?;
        emit_qtype(func.returns, true, out)?;
    }
    write!(out, " ${}(", def.name)?;
    for (i, param) in func.params.iter().enumerate() {
        emit_qtype(param.ty, true, out)?;
        write!(out, " %{}", param.name)?;
        if i + 1 < func.params.len() {
            write!(out, ", ")?;
        }
    }
    write!(out, ") {{\n")?;

    for stmt in func.prelude() {
        emit_stmt(stmt, out)?;
    }
    for stmt in func.body() {
        emit_stmt(stmt, out)?;
    }

    write!(out, "}}\n\n")
}

/// Byte strings split into quoted runs of printable bytes, with every
/// non-printable byte (and quote and backslash) spelled out, terminated by
/// an explicit zero.
fn emit_data_string<W: Write>(bytes: &[u8], out: &mut W) -> io::Result<()> {
    let mut quoted = false;
    for &b in bytes {
        let printable = (0x20..=0x7e).contains(&b) && b != b'"' && b != b'\\';
        if printable {
            if !quoted {
                quoted = true;
                write!(out, "b \"")?;
            }
            write!(out, "{}", b as char)?;
        } else {
            if quoted {
                quoted = false;
                write!(out, "\", ")?;
            }
            write!(out, "b {}, ", b)?;
        }
    }
    if quoted {
        write!(out, "\", b 0")
    } else {
        write!(out, "b 0")
    }
}

fn is_zeroes(items: &[DataItem]) -> bool {
    items.iter().all(|item| match item {
        DataItem::Zeroed(_) => true,
        DataItem::Value(Value::Constant(c)) => c.is_zero(),
        DataItem::Value(_) => false,
        DataItem::Bytes(bytes) => bytes.iter().all(|&b| b == 0),
        DataItem::SymOffs { .. } => false,
    })
}

fn emit_data<W: Write>(def: &Def, data: &DataDef, out: &mut W) -> io::Result<()> {
    write!(out, "{}data ", if def.exported { "export " } else { "" })?;
    match (&data.section, &data.secflags) {
        (Some(section), Some(secflags)) => {
            write!(out, "section \"{}\" \"{}\" ", section, secflags)?
        }
        (Some(section), None) => write!(out, "section \"{}\" ", section)?,
        (None, _) => {
            if is_zeroes(&data.items) {
                write!(out, "section \".bss.{}\" ", def.name)?;
            } else {
                write!(out, "section \".data.{}\" ", def.name)?;
            }
        }
    }
    write!(out, "${} = {{ ", def.name)?;

    for (i, item) in data.items.iter().enumerate() {
        match item {
            DataItem::Value(value) => {
                emit_qtype(value.ty(), true, out)?;
                write!(out, " ")?;
                emit_value(value, out)?;
            }
            DataItem::Zeroed(n) => write!(out, "z {}", n)?,
            DataItem::Bytes(bytes) => emit_data_string(bytes, out)?,
            DataItem::SymOffs { sym, offset } => write!(out, "l ${} + {}", sym, offset)?,
        }
        if i + 1 < data.items.len() {
            write!(out, ", ")?;
        } else {
            write!(out, " ")?;
        }
    }

    write!(out, "}}\n\n")
}

fn emit_def<W: Write>(def: &Def, out: &mut W) -> io::Result<()> {
    match &def.kind {
        DefKind::Type(ty) => emit_type_def(def, ty, out),
        DefKind::Func(func) => emit_func(def, func, out),
        DefKind::Data(data) => emit_data(def, data, out),
    }
}

#[cfg(test)]
mod tests {
    use ternc_util::Symbol;

    use super::*;
    use crate::ir::FuncParam;

    fn render(program: &Program) -> String {
        let mut buf = Vec::new();
        emit(program, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    fn data_def(name: &str, exported: bool, data: DataDef) -> Def {
        Def {
            name: Symbol::intern(name),
            exported,
            kind: DefKind::Data(data),
        }
    }

    #[test]
    fn zeroed_data_lands_in_bss() {
        let mut program = Program::new();
        program.push(data_def(
            "z",
            false,
            DataDef {
                section: None,
                secflags: None,
                items: vec![DataItem::Zeroed(16)],
            },
        ));
        assert_eq!(render(&program), "data section \".bss.z\" $z = { z 16 }\n\n");
    }

    #[test]
    fn nonzero_data_lands_in_data() {
        let mut program = Program::new();
        program.push(data_def(
            "x",
            true,
            DataDef {
                section: None,
                secflags: None,
                items: vec![DataItem::Value(Value::const_word(IrType::Word, 42))],
            },
        ));
        assert_eq!(
            render(&program),
            "export data section \".data.x\" $x = { w 42 }\n\n"
        );
    }

    #[test]
    fn zero_valued_items_still_classify_as_bss() {
        let mut program = Program::new();
        program.push(data_def(
            "zz",
            false,
            DataDef {
                section: None,
                secflags: None,
                items: vec![
                    DataItem::Value(Value::const_word(IrType::Word, 0)),
                    DataItem::Bytes(vec![0, 0]),
                    DataItem::Zeroed(4),
                ],
            },
        ));
        assert!(render(&program).starts_with("data section \".bss.zz\" "));
    }

    #[test]
    fn explicit_section_is_verbatim() {
        let mut program = Program::new();
        program.push(data_def(
            "init",
            false,
            DataDef {
                section: Some(".init_array".into()),
                secflags: None,
                items: vec![DataItem::SymOffs {
                    sym: Symbol::intern("f"),
                    offset: 0,
                }],
            },
        ));
        assert_eq!(
            render(&program),
            "data section \".init_array\" $init = { l $f + 0 }\n\n"
        );
    }

    #[test]
    fn section_flags_follow_the_section() {
        let mut program = Program::new();
        program.push(data_def(
            "t",
            false,
            DataDef {
                section: Some(".test".into()),
                secflags: Some("aw".into()),
                items: vec![DataItem::Zeroed(1)],
            },
        ));
        assert!(render(&program).starts_with("data section \".test\" \"aw\" $t = "));
    }

    #[test]
    fn data_strings_split_on_unprintable_bytes() {
        let mut program = Program::new();
        program.push(data_def(
            "s",
            false,
            DataDef {
                section: None,
                secflags: None,
                items: vec![DataItem::Bytes(b"hi\n\"done".to_vec())],
            },
        ));
        assert_eq!(
            render(&program),
            "data section \".data.s\" $s = { b \"hi\", b 10, b 34, b \"done\", b 0 }\n\n"
        );
    }

    #[test]
    fn unprintable_only_string_has_no_quotes() {
        let mut program = Program::new();
        program.push(data_def(
            "b",
            false,
            DataDef {
                section: None,
                secflags: None,
                items: vec![DataItem::Bytes(vec![0x01, 0xff])],
            },
        ));
        assert_eq!(
            render(&program),
            "data section \".data.b\" $b = { b 1, b 255, b 0 }\n\n"
        );
    }

    #[test]
    fn function_surface() {
        let mut func = Function::new(IrType::Void);
        func.push(Statement::Label(Symbol::intern("start")));
        func.push(Statement::Instruction {
            instr: Instr::Ret,
            out: None,
            args: Vec::new(),
        });
        let mut program = Program::new();
        program.push(Def {
            name: Symbol::intern("main"),
            exported: true,
            kind: DefKind::Func(func),
        });
        assert_eq!(
            render(&program),
            "export function section \".text.main\" \"ax\" $main() {\n\
             @start\n\
             \tret\n\
             }\n\n"
        );
    }

    #[test]
    fn function_with_params_and_result() {
        let mut func = Function::new(IrType::Word);
        func.params.push(FuncParam {
            name: Symbol::intern("a"),
            ty: IrType::Word,
        });
        func.params.push(FuncParam {
            name: Symbol::intern("b"),
            ty: IrType::Long,
        });
        func.push(Statement::Label(Symbol::intern("start")));
        func.push(Statement::Instruction {
            instr: Instr::Ret,
            out: None,
            args: vec![Value::const_word(IrType::Word, 0)],
        });
        let mut program = Program::new();
        program.push(Def {
            name: Symbol::intern("f"),
            exported: false,
            kind: DefKind::Func(func),
        });
        assert_eq!(
            render(&program),
            "function section \".text.f\" \"ax\" w $f(w %a, l %b) {\n\
             @start\n\
             \tret 0\n\
             }\n\n"
        );
    }

    #[test]
    fn instruction_output_degrades_aggregates_to_long() {
        let aggr = IrType::Aggregate(Symbol::intern("S"));
        let mut func = Function::new(IrType::Void);
        func.push(Statement::Label(Symbol::intern("start")));
        func.push(Statement::Instruction {
            instr: Instr::Copy,
            out: Some(Value::temporary(Symbol::intern("r"), aggr)),
            args: vec![Value::temporary(Symbol::intern("x"), aggr)],
        });
        let mut program = Program::new();
        program.push(Def {
            name: Symbol::intern("g"),
            exported: false,
            kind: DefKind::Func(func),
        });
        assert!(render(&program).contains("\t%r =l copy %x\n"));
    }

    #[test]
    fn call_keeps_aggregate_output_type() {
        let aggr = IrType::Aggregate(Symbol::intern("S"));
        let mut func = Function::new(aggr);
        func.push(Statement::Label(Symbol::intern("start")));
        func.push(Statement::call(
            Some(Value::temporary(Symbol::intern("r"), aggr)),
            Value::global(Symbol::intern("f"), IrType::Long),
            vec![
                Value::temporary(Symbol::intern("a"), IrType::Word),
                Value::temporary(Symbol::intern("b"), IrType::Word),
            ],
        ));
        let mut program = Program::new();
        program.push(Def {
            name: Symbol::intern("caller"),
            exported: false,
            kind: DefKind::Func(func),
        });
        assert!(render(&program).contains("\t%r =:S call $f(w %a, w %b)\n"));
    }

    #[test]
    fn comments_and_labels() {
        let mut func = Function::new(IrType::Void);
        func.push_prelude(Statement::Comment("prelude note".into()));
        func.push(Statement::Label(Symbol::intern("start")));
        let mut program = Program::new();
        program.push(Def {
            name: Symbol::intern("c"),
            exported: false,
            kind: DefKind::Func(func),
        });
        let text = render(&program);
        assert!(text.contains("\t# prelude note\n"));
        assert!(text.contains("@start\n"));
    }

    #[test]
    fn type_definitions() {
        let mut program = Program::new();
        program.push(Def {
            name: Symbol::intern("pair"),
            exported: false,
            kind: DefKind::Type(TypeDef {
                align: None,
                layout: Layout::Fields(vec![
                    Field {
                        ty: Some(IrType::Word),
                        count: None,
                    },
                    Field {
                        ty: Some(IrType::Byte),
                        count: Some(8),
                    },
                ]),
                describes: None,
            }),
        });
        assert_eq!(render(&program), "type :pair = { w, b 8 }\n\n");
    }

    #[test]
    fn union_type_definitions() {
        let mut program = Program::new();
        program.push(Def {
            name: Symbol::intern("either"),
            exported: false,
            kind: DefKind::Type(TypeDef {
                align: Some(8),
                layout: Layout::Union(vec![
                    vec![Field {
                        ty: Some(IrType::Long),
                        count: None,
                    }],
                    vec![Field {
                        ty: Some(IrType::Byte),
                        count: Some(16),
                    }],
                ]),
                describes: Some("union either".into()),
            }),
        });
        assert_eq!(
            render(&program),
            "# union either\ntype :either = align 8 { { l } { b 16 } }\n\n"
        );
    }

    #[test]
    fn long_constants_print_signed() {
        let mut program = Program::new();
        program.push(data_def(
            "neg",
            false,
            DataDef {
                section: None,
                secflags: None,
                items: vec![DataItem::Value(Value::const_long(u64::MAX))],
            },
        ));
        assert!(render(&program).contains("{ l -1 }"));
    }

    #[test]
    fn float_constants_use_prefixes() {
        let mut program = Program::new();
        program.push(data_def(
            "f",
            false,
            DataDef {
                section: None,
                secflags: None,
                items: vec![
                    DataItem::Value(Value::const_single(1.5)),
                    DataItem::Value(Value::const_double(2.0)),
                ],
            },
        ));
        assert!(render(&program).contains("{ s s_1.500000, d d_2.000000 }"));
    }

    #[test]
    fn emission_is_deterministic() {
        let mut func = Function::new(IrType::Word);
        func.push(Statement::Label(Symbol::intern("start")));
        func.push(Statement::Instruction {
            instr: Instr::Ret,
            out: None,
            args: vec![Value::const_word(IrType::Word, 7)],
        });
        let mut program = Program::new();
        program.push(Def {
            name: Symbol::intern("det"),
            exported: false,
            kind: DefKind::Func(func),
        });
        program.push(data_def(
            "blob",
            false,
            DataDef {
                section: None,
                secflags: None,
                items: vec![DataItem::Bytes(b"abc\x00".to_vec())],
            },
        ));
        assert_eq!(render(&program), render(&program));
    }

    #[test]
    fn program_order_is_emission_order() {
        let mut program = Program::new();
        for name in ["one", "two", "three"] {
            program.push(data_def(
                name,
                false,
                DataDef {
                    section: None,
                    secflags: None,
                    items: vec![DataItem::Zeroed(1)],
                },
            ));
        }
        let text = render(&program);
        let one = text.find("$one").unwrap();
        let two = text.find("$two").unwrap();
        let three = text.find("$three").unwrap();
        assert!(one < two && two < three);
    }
}
