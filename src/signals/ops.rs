//! Arithmetic operators on nodes.
//!
//! Every operator builds a combinator node; nothing is evaluated until the
//! result is pulled. `a - b` is `a + (-b)` and `a / b` is `a * (1 / b)`.

use std::ops::{Add, Div, Mul, Neg, Sub};

use super::{IntoNode, Node, Operand};
use crate::combinators;

macro_rules! node_operator {
    ($Trait:ident, $method:ident, $build:path) => {
        impl<K: ?Sized, R: Into<Operand>> $Trait<R> for Node<K>
        where
            Node<K>: IntoNode,
        {
            type Output = Node;

            fn $method(self, rhs: R) -> Node {
                $build(self.into(), rhs.into())
            }
        }

        impl<K: ?Sized, R: Into<Operand>> $Trait<R> for &Node<K>
        where
            Node<K>: IntoNode,
        {
            type Output = Node;

            fn $method(self, rhs: R) -> Node {
                $build(self.into(), rhs.into())
            }
        }

        impl<K: ?Sized> $Trait<Node<K>> for f64
        where
            Node<K>: IntoNode,
        {
            type Output = Node;

            fn $method(self, rhs: Node<K>) -> Node {
                $build(Operand::Scalar(self), rhs.into())
            }
        }

        impl<K: ?Sized> $Trait<&Node<K>> for f64
        where
            Node<K>: IntoNode,
        {
            type Output = Node;

            fn $method(self, rhs: &Node<K>) -> Node {
                $build(Operand::Scalar(self), rhs.into())
            }
        }
    };
}

node_operator!(Add, add, combinators::add);
node_operator!(Sub, sub, combinators::subtract);
node_operator!(Mul, mul, combinators::multiply);
node_operator!(Div, div, combinators::divide);

impl<K: ?Sized> Neg for Node<K>
where
    Node<K>: IntoNode,
{
    type Output = Node;

    fn neg(self) -> Node {
        combinators::additive_inverse(self.into())
    }
}

impl<K: ?Sized> Neg for &Node<K>
where
    Node<K>: IntoNode,
{
    type Output = Node;

    fn neg(self) -> Node {
        combinators::additive_inverse(self.into())
    }
}

#[cfg(test)]
mod tests {
    use crate::{Block, Context, Node, Result, Synthesize, Tick};

    /// Emits a constant on every frame.
    struct Dc(f64);

    impl Synthesize for Dc {
        fn synthesize(&mut self, ctx: &Context) -> Result<Vec<f64>> {
            Ok(vec![self.0; ctx.num_frames])
        }
    }

    fn first(node: &Node) -> f64 {
        let Block { samples, .. } = node.generate(Tick::new(0), 2, 10.0).unwrap();
        samples[0]
    }

    #[test]
    fn test_node_with_scalar() {
        let a = Node::new(Dc(3.0));
        assert_eq!(first(&(&a + 2.0)), 5.0);
        assert_eq!(first(&(&a - 2.0)), 1.0);
        assert_eq!(first(&(&a * 2.0)), 6.0);
        assert_eq!(first(&(&a / 2.0)), 1.5);
    }

    #[test]
    fn test_scalar_with_node() {
        let a = Node::new(Dc(4.0));
        assert_eq!(first(&(1.0 + &a)), 5.0);
        assert_eq!(first(&(1.0 - &a)), -3.0);
        assert_eq!(first(&(2.0 * &a)), 8.0);
        assert_eq!(first(&(2.0 / &a)), 0.5);
    }

    #[test]
    fn test_node_with_node() {
        let a = Node::new(Dc(6.0));
        let b = Node::new(Dc(2.0));
        assert_eq!(first(&(&a + &b)), 8.0);
        assert_eq!(first(&(&a - &b)), 4.0);
        assert_eq!(first(&(&a * &b)), 12.0);
        assert_eq!(first(&(a / b)), 3.0);
    }

    #[test]
    fn test_negation() {
        let a = Node::new(Dc(0.25));
        assert_eq!(first(&-&a), -0.25);
        assert_eq!(first(&-a), -0.25);
    }

    #[test]
    fn test_construction_does_no_work() {
        let a = Node::new(Dc(1.0));
        let _graph = (&a * 2.0 + 1.0) / 3.0;
        assert_eq!(a.cursor(), 0);
    }
}
