#![allow(clippy::doc_markdown)]
/// Fixed-size two-dimensional array
///
/// Based on a subset of Harrison McCullough's MIT-licensed [`array2d`] crate.
///
/// [`array2d`]: https://github.com/HarrisonMc555/array2d
use std::ops::{Index, IndexMut};

/// A fixed sized two-dimensional array.
#[derive(Clone, PartialEq)]
pub struct Array2D<T> {
    array: Box<[T]>,
    num_rows: usize,
}

impl<T> std::fmt::Debug for Array2D<T> {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            fmt,
            "Array2D<{}; WxH = {}x{}>",
            std::any::type_name::<T>(),
            self.num_columns(),
            self.num_rows()
        )
    }
}

/// An error that can arise during the construction of an [`Array2D`].
#[derive(Debug, Eq, PartialEq, thiserror::Error, displaydoc::Display)]
pub enum Array2DError {
    /// rows have differing lengths
    DimensionMismatch,
    /// the array has no elements
    Empty,
}

impl<T> Array2D<T> {
    /// Creates a new [`Array2D`] from a slice of rows, each of which is a
    /// [`Vec`] of elements.
    ///
    /// # Errors
    ///
    /// Returns `DimensionMismatch` if the rows are not all the same size,
    ///  or `Empty` if there are no elements.
    pub fn from_rows(elements: &[Vec<T>]) -> Result<Self, Array2DError>
    where
        T: Clone,
    {
        let row_len = elements.first().map_or(0, Vec::len);

        if row_len == 0 {
            return Err(Array2DError::Empty);
        }

        if !elements.iter().all(|row| row.len() == row_len) {
            return Err(Array2DError::DimensionMismatch);
        }

        Ok(Self {
            array: elements
                .iter()
                .flat_map(Vec::clone)
                .collect::<Vec<_>>()
                .into_boxed_slice(),
            num_rows: elements.len(),
        })
    }

    /// Creates a new [`Array2D`] with the specified number of rows and
    /// columns that contains `element` in every location.
    #[must_use]
    pub fn filled_with(element: T, num_rows: usize, num_columns: usize) -> Self
    where
        T: Clone,
    {
        Self {
            array: vec![element; num_rows * num_columns].into_boxed_slice(),
            num_rows,
        }
    }

    #[must_use]
    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    #[must_use]
    pub fn num_columns(&self) -> usize {
        if self.num_rows == 0 {
            0
        } else {
            self.array.len() / self.num_rows
        }
    }

    /// Returns a reference to the element at the given `row` and `column`
    /// if the index is in bounds
    #[must_use]
    pub fn get(&self, row: usize, column: usize) -> Option<&T> {
        if row < self.num_rows && column < self.num_columns() {
            self.array.get(row * self.num_columns() + column)
        } else {
            None
        }
    }

    /// Returns an [`Iterator`] over references to all elements in
    /// [row major order].
    ///
    /// [row major order]: https://en.wikipedia.org/wiki/Row-_and_column-major_order
    pub fn elements_row_major_iter(&self) -> impl DoubleEndedIterator<Item = &T> {
        self.array.iter()
    }

    /// Returns a slice of the `row`-th row
    #[must_use]
    pub fn row(&self, row: usize) -> &[T] {
        let num_columns = self.num_columns();

        &self.array[(row * num_columns)..((row + 1) * num_columns)]
    }

    /// Converts the [`Array2D`] back into a [`Vec`] of rows
    #[must_use]
    pub fn as_rows(&self) -> Vec<Vec<T>>
    where
        T: Clone,
    {
        (0..self.num_rows).map(|row| self.row(row).to_vec()).collect()
    }
}

impl<T> Index<(usize, usize)> for Array2D<T> {
    type Output = T;

    /// Returns the element at the given indices, given as `(row, column)`.
    ///
    /// # Panics
    ///
    /// Panics if the indices are out of bounds.
    fn index(&self, (row, column): (usize, usize)) -> &Self::Output {
        self.get(row, column)
            .unwrap_or_else(|| panic!("Index indices {}, {} out of bounds", row, column))
    }
}

impl<T> IndexMut<(usize, usize)> for Array2D<T> {
    fn index_mut(&mut self, (row, column): (usize, usize)) -> &mut Self::Output {
        let num_columns = self.num_columns();

        if row < self.num_rows && column < num_columns {
            &mut self.array[row * num_columns + column]
        } else {
            panic!("Index mut indices {}, {} out of bounds", row, column)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Array2D, Array2DError};

    #[test]
    fn from_rows_round_trips() {
        let rows = vec![vec![1, 2, 3], vec![4, 5, 6]];
        let array = Array2D::from_rows(&rows).unwrap();

        assert_eq!(array.num_rows(), 2);
        assert_eq!(array.num_columns(), 3);
        assert_eq!(array[(1, 2)], 6);
        assert_eq!(array.row(0), &[1, 2, 3]);
        assert_eq!(array.as_rows(), rows);
        assert_eq!(array.get(2, 0), None);
    }

    #[test]
    fn from_rows_rejects_ragged_and_empty() {
        assert_eq!(
            Array2D::from_rows(&[vec![1, 2], vec![3]]),
            Err(Array2DError::DimensionMismatch)
        );
        assert_eq!(
            Array2D::<u8>::from_rows(&[]),
            Err(Array2DError::Empty)
        );
    }
}
