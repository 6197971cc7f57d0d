use std::collections::BTreeSet;
use std::rc::Rc;

/*-------------------------------------------------------------------------------------------------
  Utilities
-------------------------------------------------------------------------------------------------*/

/*--------------------------------------------------------------------------------------
  Work with Reference Counted String Slices
--------------------------------------------------------------------------------------*/

pub fn get_rc_str_from_set(value: &str, set: &BTreeSet<Rc<str>>) -> Option<Rc<str>> {
    set.get(value).map(Rc::clone)
}
