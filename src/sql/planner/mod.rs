mod expression;
mod node;
mod optimizer;
mod plan;
mod planner;

pub use expression::Expression;
pub use node::{BoxedNode, Node};
pub use plan::{Aggregate, Direction, Plan};
pub use planner::Planner;
