use std::error::Error;

/// Boxed static error type
pub type Err = Box<dyn Error + 'static>;

/// Every way of picking one element from each list, in order. Elements are
/// cloned. An empty list of choices has exactly one (empty) pick, and a list
/// with any empty choice has none.
///
/// ```
/// let choices = vec![
///   vec!["alice"],
///   vec!["must", "may"],
///   vec!["run", "leave"],
/// ];
///
/// assert_eq!(modal_earley::utils::combinations(&choices), vec![
///   vec!["alice", "must", "run"],
///   vec!["alice", "may", "run"],
///   vec!["alice", "must", "leave"],
///   vec!["alice", "may", "leave"],
/// ]);
/// ```
pub fn combinations<T>(list: &[Vec<T>]) -> Vec<Vec<T>>
where
  T: Clone,
{
  let Some((head, tail)) = list.split_first() else {
    return vec![Vec::new()];
  };

  combinations(tail)
    .into_iter()
    .flat_map(|rest| {
      // every choice in the head, each followed by this pick from the tail
      head.iter().map(move |v| {
        let mut pick = Vec::with_capacity(rest.len() + 1);
        pick.push(v.clone());
        pick.extend(rest.iter().cloned());
        pick
      })
    })
    .collect()
}
