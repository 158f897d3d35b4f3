mod test_traversal;
