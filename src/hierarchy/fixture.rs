// Fri Oct 16 2026 - Alex

use crate::error::ModelResult;
use crate::hierarchy::{ClassBuilder, ClassId, DataMember, PrimitiveType};
use crate::model::ObjectModel;

/// Ids of the reference hierarchy.
///
/// ```text
/// Simple                { int is1; void s(); int is2; }
/// A : Simple            { int ia1; virtual f, g, h; int ia2; }
/// SecondContainingVfs   { int ise1; virtual u, v; int ise2; }
/// ThirdContainingVfs    { virtual i, j; }
/// B : virtual A         { int ib1; f; h; int ib2; }
/// D : virtual A, ThirdContainingVfs { int id1; f; h; int id2; }
/// C : A, SecondContainingVfs        { int ic1; f; h; int ic2; }
/// E : B, D, virtual SecondContainingVfs { C c; B b; int ie1; f; h; int ie2; }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ReferenceHierarchy {
    pub simple: ClassId,
    pub a: ClassId,
    pub second: ClassId,
    pub third: ClassId,
    pub b: ClassId,
    pub d: ClassId,
    pub c: ClassId,
    pub e: ClassId,
}

pub fn define_reference_hierarchy(model: &mut ObjectModel) -> ModelResult<ReferenceHierarchy> {
    let config = model.config().clone();
    let int = |name: &str| DataMember::primitive(name, PrimitiveType::Int, &config);

    let simple = {
        let builder = ClassBuilder::new("Simple")
            .member(int("is1"))
            .method("s")
            .member(int("is2"));
        model.define(builder)?
    };

    let a = {
        let builder = ClassBuilder::new("A")
            .base(simple)
            .member(int("ia1"))
            .virtual_method("f")
            .virtual_method("g")
            .virtual_method("h")
            .member(int("ia2"));
        model.define(builder)?
    };

    let second = {
        let builder = ClassBuilder::new("SecondContainingVfs")
            .member(int("ise1"))
            .virtual_method("u")
            .virtual_method("v")
            .member(int("ise2"));
        model.define(builder)?
    };

    let third = model.define(
        ClassBuilder::new("ThirdContainingVfs")
            .virtual_method("i")
            .virtual_method("j"),
    )?;

    let b = {
        let builder = ClassBuilder::new("B")
            .virtual_base(a)
            .member(int("ib1"))
            .method("f")
            .method("h")
            .member(int("ib2"));
        model.define(builder)?
    };

    let d = {
        let builder = ClassBuilder::new("D")
            .virtual_base(a)
            .base(third)
            .member(int("id1"))
            .method("f")
            .method("h")
            .member(int("id2"));
        model.define(builder)?
    };

    let c = {
        let builder = ClassBuilder::new("C")
            .base(a)
            .base(second)
            .member(int("ic1"))
            .method("f")
            .method("h")
            .member(int("ic2"));
        model.define(builder)?
    };

    let e = {
        let builder = ClassBuilder::new("E")
            .base(b)
            .base(d)
            .virtual_base(second)
            .object("c", c)
            .object("b", b)
            .member(int("ie1"))
            .method("f")
            .method("h")
            .member(int("ie2"));
        model.define(builder)?
    };

    Ok(ReferenceHierarchy {
        simple,
        a,
        second,
        third,
        b,
        d,
        c,
        e,
    })
}
