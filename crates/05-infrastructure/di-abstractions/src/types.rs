//! 类型描述与可赋值性规则
//!
//! Bean 的类型闭包由元数据提取层给出，已包含全部超类型；类型参数上的子类型关系
//! 则通过 [`TypeHierarchy`] 查询。

use once_cell::sync::Lazy;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

/// 顶层类型名称，所有类型都可以赋值给它
pub const OBJECT: &str = "Object";

/// 类型描述符
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TypeDescriptor {
    /// 类或接口，`arguments` 为空表示原始类型
    Class {
        name: Arc<str>,
        arguments: Vec<TypeDescriptor>,
    },
    /// 数组类型
    Array(Box<TypeDescriptor>),
    /// 类型变量，`bounds` 为空表示无界
    Variable {
        name: Arc<str>,
        bounds: Vec<TypeDescriptor>,
    },
    /// 通配符，只出现在类型参数位置
    Wildcard {
        upper: Vec<TypeDescriptor>,
        lower: Vec<TypeDescriptor>,
    },
}

impl TypeDescriptor {
    /// 原始类型
    pub fn class(name: impl Into<Arc<str>>) -> Self {
        Self::Class {
            name: name.into(),
            arguments: Vec::new(),
        }
    }

    /// 参数化类型
    pub fn parameterized(
        name: impl Into<Arc<str>>,
        arguments: impl IntoIterator<Item = TypeDescriptor>,
    ) -> Self {
        Self::Class {
            name: name.into(),
            arguments: arguments.into_iter().collect(),
        }
    }

    /// 数组类型
    pub fn array_of(component: TypeDescriptor) -> Self {
        Self::Array(Box::new(component))
    }

    /// 无界类型变量
    pub fn variable(name: impl Into<Arc<str>>) -> Self {
        Self::Variable {
            name: name.into(),
            bounds: Vec::new(),
        }
    }

    /// 有界类型变量
    pub fn bounded_variable(
        name: impl Into<Arc<str>>,
        bounds: impl IntoIterator<Item = TypeDescriptor>,
    ) -> Self {
        Self::Variable {
            name: name.into(),
            bounds: bounds.into_iter().collect(),
        }
    }

    /// `?`
    pub fn wildcard() -> Self {
        Self::Wildcard {
            upper: Vec::new(),
            lower: Vec::new(),
        }
    }

    /// `? extends upper`
    pub fn wildcard_extends(upper: TypeDescriptor) -> Self {
        Self::Wildcard {
            upper: vec![upper],
            lower: Vec::new(),
        }
    }

    /// `? super lower`
    pub fn wildcard_super(lower: TypeDescriptor) -> Self {
        Self::Wildcard {
            upper: Vec::new(),
            lower: vec![lower],
        }
    }

    /// 顶层类型
    pub fn object() -> Self {
        Self::class(OBJECT)
    }

    pub fn is_object(&self) -> bool {
        matches!(self, Self::Class { name, arguments } if &**name == OBJECT && arguments.is_empty())
    }

    /// 原始类型名；数组取元素类型的名称
    pub fn raw_name(&self) -> Option<&str> {
        match self {
            Self::Class { name, .. } => Some(&**name),
            Self::Array(component) => component.raw_name(),
            Self::Variable { .. } | Self::Wildcard { .. } => None,
        }
    }

    pub fn is_parameterized(&self) -> bool {
        match self {
            Self::Class { arguments, .. } => !arguments.is_empty(),
            Self::Array(component) => component.is_parameterized(),
            Self::Variable { .. } | Self::Wildcard { .. } => false,
        }
    }

    /// 去掉类型参数后的原始类型
    pub fn raw(&self) -> Self {
        match self {
            Self::Class { name, .. } => Self::Class {
                name: Arc::clone(name),
                arguments: Vec::new(),
            },
            Self::Array(component) => Self::array_of(component.raw()),
            other => other.clone(),
        }
    }

    /// `actual` 能否赋值给 `self`，不考虑类型层次结构
    pub fn is_assignable_from(&self, actual: &Self) -> bool {
        self.is_assignable_in(actual, &EMPTY_HIERARCHY)
    }

    /// `actual` 能否赋值给 `self`
    ///
    /// 规则是协变的：相同类型、`actual` 的超类型或拓宽（通配符、类型变量）可以匹配，收窄不可以。
    /// 顶层的 `Object` 接受任何类型。超类型从 `hierarchy` 查询，类型参数和边界同样适用。
    pub fn is_assignable_in(&self, actual: &Self, hierarchy: &TypeHierarchy) -> bool {
        if self.is_object() {
            return true;
        }

        hierarchy
            .closure(actual)
            .iter()
            .any(|candidate| self.matches_exactly(candidate, hierarchy))
    }

    fn matches_exactly(&self, actual: &Self, hierarchy: &TypeHierarchy) -> bool {
        match (self, actual) {
            (
                Self::Class {
                    name: required_name,
                    arguments: required_arguments,
                },
                Self::Class {
                    name: actual_name,
                    arguments: actual_arguments,
                },
            ) => {
                required_name == actual_name
                    && arguments_match(required_arguments, actual_arguments, hierarchy)
            }
            (Self::Array(required), Self::Array(actual)) => required.is_assignable_in(actual, hierarchy),
            (Self::Variable { bounds, .. }, actual) => satisfies_bounds(actual, bounds, hierarchy),
            _ => false,
        }
    }

    /// 无界：`Object`、无界类型变量或无界通配符
    fn is_unbounded(&self) -> bool {
        match self {
            Self::Variable { bounds, .. } => bounds.iter().all(Self::is_object),
            Self::Wildcard { upper, lower } => lower.is_empty() && upper.iter().all(Self::is_object),
            other => other.is_object(),
        }
    }

    /// 类型参数位置上的匹配
    fn argument_accepts(&self, actual: &Self, hierarchy: &TypeHierarchy) -> bool {
        let assignable = |required: &Self, actual: &Self| required.is_assignable_in(actual, hierarchy);

        match self {
            Self::Wildcard { upper, lower } => match actual {
                Self::Variable { bounds, .. } => {
                    upper.iter().all(|u| {
                        u.is_object() || bounds.iter().any(|b| assignable(u, b) || assignable(b, u))
                    }) && lower
                        .iter()
                        .all(|l| bounds.iter().all(|b| assignable(b, l)))
                }
                Self::Wildcard { .. } => false,
                _ => {
                    upper.iter().all(|u| assignable(u, actual))
                        && lower.iter().all(|l| assignable(actual, l))
                }
            },
            Self::Variable { bounds, .. } => match actual {
                Self::Variable {
                    bounds: actual_bounds,
                    ..
                } => bounds
                    .iter()
                    .all(|b| b.is_object() || actual_bounds.iter().any(|ab| assignable(b, ab))),
                Self::Wildcard { .. } => false,
                _ => satisfies_bounds(actual, bounds, hierarchy),
            },
            exact => match actual {
                Self::Variable { bounds, .. } => bounds.iter().all(|b| assignable(b, exact)),
                _ => exact == actual,
            },
        }
    }
}

fn arguments_match(
    required: &[TypeDescriptor],
    actual: &[TypeDescriptor],
    hierarchy: &TypeHierarchy,
) -> bool {
    match (required.is_empty(), actual.is_empty()) {
        (true, true) => true,
        (true, false) => actual.iter().all(TypeDescriptor::is_unbounded),
        (false, true) => required.iter().all(TypeDescriptor::is_unbounded),
        (false, false) => {
            required.len() == actual.len()
                && required
                    .iter()
                    .zip(actual)
                    .all(|(r, a)| r.argument_accepts(a, hierarchy))
        }
    }
}

fn satisfies_bounds(actual: &TypeDescriptor, bounds: &[TypeDescriptor], hierarchy: &TypeHierarchy) -> bool {
    bounds.iter().all(|bound| bound.is_assignable_in(actual, hierarchy))
}

static EMPTY_HIERARCHY: Lazy<TypeHierarchy> = Lazy::new(TypeHierarchy::new);

/// 类型层次结构
///
/// 按原始类型名记录直接超类型，由元数据提取层提供。Bean 的类型闭包已经展开了超类型，
/// 这里主要服务于类型参数、通配符边界和类型变量边界上的子类型判断。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeHierarchy {
    supertypes: BTreeMap<Arc<str>, Vec<TypeDescriptor>>,
}

impl TypeHierarchy {
    pub fn new() -> Self {
        Self::default()
    }

    /// 声明 `subtype` 的一个直接超类型
    pub fn with_supertype(mut self, subtype: impl Into<Arc<str>>, supertype: TypeDescriptor) -> Self {
        self.add_supertype(subtype, supertype);
        self
    }

    pub fn add_supertype(&mut self, subtype: impl Into<Arc<str>>, supertype: TypeDescriptor) {
        let supertypes = self.supertypes.entry(subtype.into()).or_default();
        if !supertypes.contains(&supertype) {
            supertypes.push(supertype);
        }
    }

    /// 合并另一个层次结构
    pub fn merge(&mut self, other: &TypeHierarchy) {
        for (subtype, supertypes) in &other.supertypes {
            for supertype in supertypes {
                self.add_supertype(Arc::clone(subtype), supertype.clone());
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.supertypes.is_empty()
    }

    /// 直接超类型
    pub fn direct_supertypes(&self, raw_name: &str) -> &[TypeDescriptor] {
        self.supertypes.get(raw_name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// `ty` 自身及其全部传递超类型，广度优先，不含重复项
    ///
    /// 只有类类型会展开；数组的协变由数组分量的比较处理。
    pub fn closure(&self, ty: &TypeDescriptor) -> Vec<TypeDescriptor> {
        let mut closure = vec![ty.clone()];
        let mut seen: BTreeSet<TypeDescriptor> = closure.iter().cloned().collect();
        let mut next = 0;

        while next < closure.len() {
            if let TypeDescriptor::Class { name, .. } = &closure[next] {
                let discovered: Vec<TypeDescriptor> = self
                    .direct_supertypes(name)
                    .iter()
                    .filter(|supertype| seen.insert((*supertype).clone()))
                    .cloned()
                    .collect();
                closure.extend(discovered);
            }
            next += 1;
        }
        closure
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Class { name, arguments } => {
                f.write_str(name)?;
                if !arguments.is_empty() {
                    f.write_str("<")?;
                    write_joined(f, arguments, ", ")?;
                    f.write_str(">")?;
                }
                Ok(())
            }
            Self::Array(component) => write!(f, "{component}[]"),
            Self::Variable { name, .. } => f.write_str(name),
            Self::Wildcard { upper, lower } => {
                f.write_str("?")?;
                if !upper.is_empty() {
                    f.write_str(" extends ")?;
                    write_joined(f, upper, " & ")?;
                }
                if !lower.is_empty() {
                    f.write_str(" super ")?;
                    write_joined(f, lower, " & ")?;
                }
                Ok(())
            }
        }
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, types: &[TypeDescriptor], separator: &str) -> fmt::Result {
    for (index, ty) in types.iter().enumerate() {
        if index > 0 {
            f.write_str(separator)?;
        }
        write!(f, "{ty}")?;
    }
    Ok(())
}
