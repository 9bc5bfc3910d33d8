//! Element kinds and the flat storage that backs a space.
//!
//! The kind is a plain tag carried by the layout descriptor, `Space::create` looks at it
//! exactly once to pick the concrete storage. After that, access goes through `&[T]`
//! for a concrete `T: Element`, so there is no type dispatch on the element path.
//! `Buffer` is the type-erased owner for callers that only know the kind at runtime.

use std::fmt::{Debug, Display};

use num::{ToPrimitive, Zero};
use serde::{Deserialize, Serialize};
use strum::{Display as StrumDisplay, EnumIter, EnumString};

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash,
    Serialize, Deserialize, EnumIter, StrumDisplay, EnumString,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ElementKind {
    #[default]
    F64,
    F32,
    I32,
    U32,
    I16,
    U16,
    I8,
    U8,
}

impl ElementKind {
    pub fn size_of(self) -> usize {
        match self {
            Self::F64 => 8,
            Self::F32 | Self::I32 | Self::U32 => 4,
            Self::I16 | Self::U16 => 2,
            Self::I8 | Self::U8 => 1,
        }
    }

    pub fn is_float(self) -> bool {
        matches!(self, Self::F64 | Self::F32)
    }
}

/// A numeric type that can live in a buffer
pub trait Element: Copy + PartialEq + Debug + Display + Zero + ToPrimitive + Send + Sync + 'static {
    const KIND: ElementKind;

    /// Numeric cast from a float, float to int truncates toward zero and saturates
    fn from_f64(v: f64) -> Self;

    fn as_f64(self) -> f64 {
        self.to_f64().unwrap_or(f64::NAN)
    }

    fn wrap(data: Vec<Self>) -> Buffer;
    fn slice(buffer: &Buffer) -> Option<&[Self]>;
    fn slice_mut(buffer: &mut Buffer) -> Option<&mut [Self]>;
    fn into_typed(buffer: Buffer) -> Result<Vec<Self>, Buffer>;
}

// one variant per kind, the same list drives the enum, the trait impls
// and every match in Buffer
macro_rules! elements {
    ($($kind:ident => $ty:ty),* $(,)?) => {
        /// Flat, zero initialized storage tagged with its element kind
        #[derive(Clone, Debug, PartialEq)]
        pub enum Buffer {
            $($kind(Vec<$ty>),)*
        }

        $(
            impl Element for $ty {
                const KIND: ElementKind = ElementKind::$kind;

                #[inline]
                fn from_f64(v: f64) -> Self {
                    v as $ty
                }

                fn wrap(data: Vec<Self>) -> Buffer {
                    Buffer::$kind(data)
                }

                fn slice(buffer: &Buffer) -> Option<&[Self]> {
                    match buffer {
                        Buffer::$kind(d) => Some(d),
                        #[allow(unreachable_patterns)]
                        _ => None,
                    }
                }

                fn slice_mut(buffer: &mut Buffer) -> Option<&mut [Self]> {
                    match buffer {
                        Buffer::$kind(d) => Some(d),
                        #[allow(unreachable_patterns)]
                        _ => None,
                    }
                }

                fn into_typed(buffer: Buffer) -> Result<Vec<Self>, Buffer> {
                    match buffer {
                        Buffer::$kind(d) => Ok(d),
                        #[allow(unreachable_patterns)]
                        other => Err(other),
                    }
                }
            }
        )*

        impl Buffer {
            pub fn zeros(kind: ElementKind, len: usize) -> Buffer {
                match kind {
                    $(ElementKind::$kind => Buffer::$kind(vec![<$ty>::zero(); len]),)*
                }
            }

            pub fn kind(&self) -> ElementKind {
                match self {
                    $(Buffer::$kind(_) => ElementKind::$kind,)*
                }
            }

            pub fn len(&self) -> usize {
                match self {
                    $(Buffer::$kind(d) => d.len(),)*
                }
            }

            /// Reads the element at a flat offset as a float
            pub fn get_value(&self, offset: usize) -> f64 {
                match self {
                    $(Buffer::$kind(d) => d[offset].as_f64(),)*
                }
            }

            /// Writes a float at a flat offset, cast to the buffer's kind
            pub fn set_value(&mut self, offset: usize, value: f64) {
                match self {
                    $(Buffer::$kind(d) => d[offset] = <$ty>::from_f64(value),)*
                }
            }

            pub fn to_f64_vec(&self) -> Vec<f64> {
                match self {
                    $(Buffer::$kind(d) => d.iter().map(|x| x.as_f64()).collect(),)*
                }
            }
        }
    };
}

elements! {
    F64 => f64,
    F32 => f32,
    I32 => i32,
    U32 => u32,
    I16 => i16,
    U16 => u16,
    I8 => i8,
    U8 => u8,
}

impl Buffer {
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The typed contents, `None` if `T` is not this buffer's kind
    pub fn as_slice<T: Element>(&self) -> Option<&[T]> {
        T::slice(self)
    }

    pub fn as_mut_slice<T: Element>(&mut self) -> Option<&mut [T]> {
        T::slice_mut(self)
    }

    /// Gives the storage back as a `Vec<T>`, or the buffer itself if the kind differs
    pub fn into_vec<T: Element>(self) -> Result<Vec<T>, Buffer> {
        T::into_typed(self)
    }
}

impl<T: Element> From<Vec<T>> for Buffer {
    fn from(data: Vec<T>) -> Self {
        T::wrap(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn zeros_for_every_kind() {
        for kind in ElementKind::iter() {
            let b = Buffer::zeros(kind, 5);
            assert_eq!(b.kind(), kind);
            assert_eq!(b.len(), 5);
            assert_eq!(b.to_f64_vec(), vec![0.0; 5]);
        }
    }

    #[test]
    fn typed_slices_match_kind() {
        let mut b = Buffer::zeros(ElementKind::I32, 3);
        assert!(b.as_slice::<f64>().is_none());
        b.as_mut_slice::<i32>().unwrap()[1] = 7;
        assert_eq!(b.as_slice::<i32>().unwrap(), &[0, 7, 0]);
        let b = b.into_vec::<f32>().unwrap_err();
        assert_eq!(b.into_vec::<i32>().unwrap(), vec![0, 7, 0]);
    }

    #[test]
    fn set_value_casts() {
        let mut b = Buffer::zeros(ElementKind::I32, 2);
        b.set_value(0, 3.7);
        b.set_value(1, -3.7);
        assert_eq!(b.as_slice::<i32>().unwrap(), &[3, -3]);

        let mut b = Buffer::zeros(ElementKind::U8, 2);
        b.set_value(0, 300.0);
        b.set_value(1, -1.0);
        assert_eq!(b.as_slice::<u8>().unwrap(), &[255, 0]);
        assert_eq!(b.get_value(0), 255.0);
    }

    #[test]
    fn kind_names() {
        assert_eq!(ElementKind::default(), ElementKind::F64);
        assert_eq!(ElementKind::I32.to_string(), "i32");
        assert_eq!("F32".parse::<ElementKind>().unwrap(), ElementKind::F32);
        assert_eq!(ElementKind::U16.size_of(), 2);
        assert!(!ElementKind::I8.is_float());
    }
}
