/// Document shown at startup unless `--empty` is given.
pub const SAMPLE_DOCUMENT: &str = r#"# mdlive

<style>
  h1 { color: #0066cc; }
  .custom-box {
    border: 2px solid #0066cc;
    padding: 10px;
    border-radius: 5px;
    background: #e6f2ff;
  }
</style>

Type markdown on the left and watch the preview on the right. Drag the divider to resize the panes.

## Features

- **Live preview**: every keystroke re-renders the document
- **Print to PDF**: press `Ctrl+P` or click the print button, then save from the browser dialog
- **HTML and CSS**: raw tags and style blocks pass straight through

## Example content

<div class="custom-box">
  A custom HTML box styled by the block above.
</div>

### Lists
- Item 1
- Item 2
  - Nested item
  - Another nested item

### Code block
```javascript
function hello() {
  console.log("Hello, World!");
}
```

### Table
| Column 1 | Column 2 |
|----------|----------|
| Data 1   | Data 2   |
| Data 3   | Data 4   |

---

**Press Ctrl+P to print or save as PDF!**
"#;
